//! Client-side domain: inventory items, session identity, and the pure state
//! the shop view is derived from.

pub mod cache;
pub mod edit;
pub mod filter;
pub mod session;
pub mod sweet;

pub use cache::InventoryCache;
pub use edit::{EditSession, FormField, FormTarget, StagedFields};
pub use filter::{filter, FilterCriteria};
pub use session::{AuthMode, Credentials, Session};
pub use sweet::{Sweet, SweetDraft, SweetId, SweetPatch};
