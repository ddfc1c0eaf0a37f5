//! Filter engine: derives the visible subset of the inventory.

use crate::domain::sweet::Sweet;
use rust_decimal::Decimal;
use std::str::FromStr;

/// User-entered constraints over the inventory view.
///
/// Empty substrings and unset bounds impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: String,
    pub category: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl FilterCriteria {
    /// Builds criteria from the raw text of the four filter inputs.
    ///
    /// Price bounds that are blank or do not parse as a decimal are left unset.
    pub fn from_inputs(name: &str, category: &str, min_price: &str, max_price: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            min_price: parse_price_bound(min_price),
            max_price: parse_price_bound(max_price),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.category.is_empty() && self.min_price.is_none() && self.max_price.is_none()
    }

    /// All four predicates, ANDed.
    pub fn matches(&self, sweet: &Sweet) -> bool {
        contains_ignore_case(&sweet.name, &self.name)
            && contains_ignore_case(&sweet.category, &self.category)
            && self.min_price.map_or(true, |min| sweet.price >= min)
            && self.max_price.map_or(true, |max| sweet.price <= max)
    }
}

/// Returns the sweets matching `criteria`, keeping their order.
pub fn filter(items: &[Sweet], criteria: &FilterCriteria) -> Vec<Sweet> {
    items.iter().filter(|s| criteria.matches(s)).cloned().collect()
}

pub fn parse_price_bound(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
