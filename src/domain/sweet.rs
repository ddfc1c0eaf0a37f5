//! Inventory items and the payloads that create or change them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier assigned by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweetId(pub i64);

impl fmt::Display for SweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SweetId {
    fn from(id: i64) -> Self {
        SweetId(id)
    }
}

/// An inventory item as the service reports it.
///
/// The client never mutates one of these; every change goes through the
/// service and the whole list is fetched again afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    pub id: SweetId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl Sweet {
    /// Whether the purchase affordance should be enabled.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Body of `POST /sweets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweetDraft {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Body of `PUT /sweets/{id}`.
///
/// Absent fields are omitted from the JSON entirely, which the service reads
/// as "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl SweetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none() && self.quantity.is_none()
    }
}
