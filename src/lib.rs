pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{Notification, Outcome, Shop, ShopSnapshot};
pub use domain::{
    AuthMode, Credentials, EditSession, FilterCriteria, FormField, FormTarget, Session, Sweet,
    SweetDraft, SweetId, SweetPatch,
};
pub use error::{InventoryError, Operation};
pub use infra::config::ClientConfig;
pub use storage::{FileStorage, MemoryStorage, SessionStore};
pub use transport::http::{InventoryApi, InventoryClient};
