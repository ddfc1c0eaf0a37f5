use crate::domain::filter::FilterCriteria;
use crate::domain::session::Session;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthResponse {
    pub username: String,
    pub token: String,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Session::new(resp.username, resp.token)
    }
}

/// Body of `POST /sweets/{id}/restock`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct RestockRequest {
    pub quantity: NonZeroU32,
}

/// Query string of `GET /sweets/search`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
}

impl From<&FilterCriteria> for SearchParams {
    fn from(criteria: &FilterCriteria) -> Self {
        let text = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            name: text(&criteria.name),
            category: text(&criteria.category),
            min_price: criteria.min_price,
            max_price: criteria.max_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_skip_unset_criteria() {
        let criteria = FilterCriteria::from_inputs("", "gum", "1.5", "");
        let params = SearchParams::from(&criteria);

        assert_eq!(params.name, None);
        assert_eq!(params.category.as_deref(), Some("gum"));
        assert_eq!(params.min_price, Some(Decimal::new(15, 1)));
        assert_eq!(params.max_price, None);
    }
}
