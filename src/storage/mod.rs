pub mod kv;
pub mod session_store;

pub use kv::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use session_store::{SessionStore, DEFAULT_SESSION_KEY};
