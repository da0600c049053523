//! Error types for the transaction manager.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for transaction lifecycle and configuration file I/O.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transaction's base version no longer matches the live one.
    ///
    /// The transaction is left active; the caller decides whether to
    /// refetch the version and retry or give up.
    #[error("version mismatch: transaction base is {base}, live configuration is {live}")]
    VersionMismatch {
        /// Version the transaction was started against.
        base: u64,
        /// Current live version.
        live: u64,
    },

    /// No active transaction carries this ID.
    #[error("transaction '{id}' does not exist")]
    NotFound {
        /// The unknown transaction ID.
        id: String,
    },

    /// A transaction with this ID is already registered.
    #[error("transaction '{id}' already exists")]
    AlreadyExists {
        /// The conflicting transaction ID.
        id: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read configuration file '{}': {source}", path.display())]
    ReadConfig {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be written.
    #[error("cannot write configuration file '{}': {source}", path.display())]
    WriteConfig {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A staging file could not be read.
    #[error("cannot read staging file '{}': {source}", path.display())]
    ReadStaging {
        /// Path to the staging file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A staging file could not be written or removed.
    #[error("cannot write staging file '{}': {source}", path.display())]
    WriteStaging {
        /// Path to the staging file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Backup rotation failed after a commit.
    #[error("backup rotation failed for '{}': {source}", path.display())]
    Backup {
        /// Path of the backup that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
