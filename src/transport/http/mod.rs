pub mod client;
pub mod types;

pub use client::{InventoryApi, InventoryClient};
pub use types::{AuthResponse, RestockRequest, SearchParams};
