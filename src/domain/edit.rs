//! Form/edit session: whether the user is creating or editing a sweet, and
//! the field values staged in the form.

use crate::domain::sweet::{Sweet, SweetDraft, SweetId, SweetPatch};
use crate::error::{InventoryError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// One of the four form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Category,
    Price,
    Quantity,
}

/// Raw text of the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFields {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
}

impl StagedFields {
    /// Pre-fills the form from a sweet's current values.
    pub fn from_sweet(sweet: &Sweet) -> Self {
        Self {
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price.to_string(),
            quantity: sweet.quantity.to_string(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Category => &self.category,
            FormField::Price => &self.price,
            FormField::Quantity => &self.quantity,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Category => &mut self.category,
            FormField::Price => &mut self.price,
            FormField::Quantity => &mut self.quantity,
        };
        *slot = value.into();
    }

    /// Coerces every field for a create request.
    pub fn to_draft(&self) -> Result<SweetDraft> {
        Ok(SweetDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            price: parse_price(&self.price)?,
            quantity: parse_quantity(&self.quantity)?,
        })
    }

    /// Coerces the non-empty fields for an update request; blank fields are
    /// left out of the patch.
    pub fn to_patch(&self) -> Result<SweetPatch> {
        Ok(SweetPatch {
            name: non_blank(&self.name).map(str::to_string),
            category: non_blank(&self.category).map(str::to_string),
            price: non_blank(&self.price).map(parse_price).transpose()?,
            quantity: non_blank(&self.quantity).map(parse_quantity).transpose()?,
        })
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_price(input: &str) -> Result<Decimal> {
    Decimal::from_str(input.trim())
        .map_err(|_| InventoryError::ValidationRejected(format!("price '{input}' is not a number")))
}

fn parse_quantity(input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        InventoryError::ValidationRejected(format!("quantity '{input}' is not a non-negative whole number"))
    })
}

/// Which form is open. Exactly one of these is live at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Inactive,
    Creating(StagedFields),
    Editing { id: SweetId, staged: StagedFields },
}

/// The identity of an open form, used to tell whether the form a request was
/// submitted from is still the one on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    New,
    Existing(SweetId),
}

impl EditSession {
    /// "Add new": opens a blank create form. Only valid from `Inactive`; an
    /// open form is left untouched. Returns whether the state changed.
    pub fn begin_create(&mut self) -> bool {
        if matches!(self, EditSession::Inactive) {
            *self = EditSession::Creating(StagedFields::default());
            true
        } else {
            false
        }
    }

    /// "Edit": opens the edit form for `sweet`, replacing whatever form was open.
    pub fn begin_edit(&mut self, sweet: &Sweet) {
        *self = EditSession::Editing {
            id: sweet.id,
            staged: StagedFields::from_sweet(sweet),
        };
    }

    /// Replaces one staged value. No-op while inactive.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.staged_mut() {
            Some(staged) => {
                staged.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Closes any open form, discarding staged values.
    pub fn close(&mut self) {
        *self = EditSession::Inactive;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, EditSession::Inactive)
    }

    pub fn target(&self) -> Option<FormTarget> {
        match self {
            EditSession::Inactive => None,
            EditSession::Creating(_) => Some(FormTarget::New),
            EditSession::Editing { id, .. } => Some(FormTarget::Existing(*id)),
        }
    }

    pub fn staged(&self) -> Option<&StagedFields> {
        match self {
            EditSession::Inactive => None,
            EditSession::Creating(staged) | EditSession::Editing { staged, .. } => Some(staged),
        }
    }

    fn staged_mut(&mut self) -> Option<&mut StagedFields> {
        match self {
            EditSession::Inactive => None,
            EditSession::Creating(staged) | EditSession::Editing { staged, .. } => Some(staged),
        }
    }
}
