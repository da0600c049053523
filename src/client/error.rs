//! Error type for the configuration client.

use thiserror::Error;

use crate::document::DocumentError;
use crate::transaction::TransactionError;

/// Error type covering everything a [`super::ConfigClient`] operation
/// can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A document-level failure: parsing, or section and attribute
    /// addressing.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A transaction-level failure: lookups, version conflicts, file
    /// I/O, backups.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The client was constructed with unusable parameters.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParams {
        /// The offending parameter.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
