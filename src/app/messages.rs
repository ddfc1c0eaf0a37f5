//! User-facing notification texts.

pub const AUTH_FAILED: &str = "Authentication failed. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load sweets";
pub const LOGGED_OUT: &str = "Logged out successfully";

pub const ADD_OK: &str = "Sweet added successfully!";
pub const ADD_FAILED: &str = "Failed to add sweet";
pub const UPDATE_OK: &str = "Sweet updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update sweet";
pub const DELETE_OK: &str = "Sweet deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete sweet. Admin access required.";
pub const PURCHASE_OK: &str = "Purchase successful!";
pub const PURCHASE_FAILED: &str = "Purchase failed. Item may be out of stock.";
pub const RESTOCK_OK: &str = "Restock successful!";
pub const RESTOCK_FAILED: &str = "Restock failed. Admin access required.";
pub const RESTOCK_INVALID: &str = "Restock failed. Quantity must be a positive whole number.";

pub fn welcome(username: &str) -> String {
    format!("Welcome, {username}!")
}
