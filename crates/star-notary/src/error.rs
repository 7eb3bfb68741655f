//! Error types for the notary services.

use star_notary_core::{CoreError, ValidationError};
use star_notary_store::StoreError;
use thiserror::Error;

/// Errors that can occur during notary operations.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// Requester input failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored data could not be encoded or decoded.
    #[error("corrupt ledger data: {0}")]
    Core(#[from] CoreError),

    /// Address has no valid signature on file.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// No block matched the lookup.
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// No validation request exists for the address.
    #[error("validation request not found: {0}")]
    RequestNotFound(String),
}

impl NotaryError {
    /// Whether this is one of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NotaryError::BlockNotFound(_) | NotaryError::RequestNotFound(_)
        )
    }
}

/// Result type for notary operations.
pub type Result<T> = std::result::Result<T, NotaryError>;
