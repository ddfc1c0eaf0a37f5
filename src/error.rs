//! Error taxonomy for calls against the inventory service.

use reqwest::StatusCode;
use thiserror::Error;

/// The remote operation a response belongs to.
///
/// The same status code means different things depending on the call that
/// produced it (a 409 on purchase is "out of stock", on create it is a
/// rejected draft), so classification is keyed on the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Authenticate,
    List,
    Search,
    Create,
    Update,
    Delete,
    Purchase,
    Restock,
}

/// Errors returned by the inventory client.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The service rejected the credentials.
    #[error("authentication failed (status {status})")]
    AuthFailed { status: u16 },

    /// The session token is invalid or expired.
    #[error("session token rejected by the inventory service")]
    Unauthorized,

    /// The session lacks administrative privilege.
    #[error("operation requires administrative privilege")]
    Forbidden,

    /// No sweet with the requested id.
    #[error("sweet not found")]
    NotFound,

    /// The draft was rejected, either locally while coercing form input or
    /// by the service.
    #[error("rejected: {0}")]
    ValidationRejected(String),

    /// The sweet has no stock left.
    #[error("sweet is out of stock")]
    OutOfStock,

    /// Network failure or an undecodable response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No session is present; the call was never sent.
    #[error("not signed in")]
    NotAuthenticated,

    /// A status the operation has no meaning for (typically 5xx).
    #[error("unexpected status {status}: {body}")]
    Unexpected { status: u16, body: String },
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

impl InventoryError {
    /// Classifies a non-success response of `op`.
    pub fn from_status(op: Operation, status: StatusCode, body: String) -> Self {
        let code = status.as_u16();

        if op == Operation::Authenticate {
            return if status.is_client_error() {
                InventoryError::AuthFailed { status: code }
            } else {
                InventoryError::Unexpected { status: code, body }
            };
        }

        if status == StatusCode::UNAUTHORIZED {
            return InventoryError::Unauthorized;
        }

        if op == Operation::Purchase && status.is_client_error() {
            return InventoryError::OutOfStock;
        }

        if op == Operation::Create && status.is_client_error() {
            return InventoryError::ValidationRejected(rejection_reason(code, body));
        }

        match status {
            StatusCode::FORBIDDEN => InventoryError::Forbidden,
            StatusCode::NOT_FOUND => InventoryError::NotFound,
            s if s.is_client_error() && matches!(op, Operation::Update | Operation::Restock) => {
                InventoryError::ValidationRejected(rejection_reason(code, body))
            }
            _ => InventoryError::Unexpected { status: code, body },
        }
    }

    /// True when the service rejected the session token itself.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, InventoryError::Unauthorized)
    }
}

fn rejection_reason(code: u16, body: String) -> String {
    if body.trim().is_empty() {
        format!("service rejected the request (status {code})")
    } else {
        body
    }
}
