//! Transaction lifecycle: staged document copies, optimistic version
//! checks, atomic file writes, and crash replay.
//!
//! A [`TransactionStore`] is an explicit object owned by the client; the
//! mutex around the active-transactions map protects map structure only.
//! Each transaction is individually locked, so operations against
//! different transaction IDs proceed independently, and serializing
//! concurrent writers of a single transaction remains the caller's
//! contract.

pub mod backup;
mod error;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

pub use error::TransactionError;

use crate::directive::TimeFormat;
use crate::document::{Document, FileKind};

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Started and accepting edits.
    Active,
    /// Committed; about to be deregistered.
    Committed,
    /// Discarded without committing.
    Aborted,
}

/// One staged, isolated copy of the configuration document.
#[derive(Debug)]
pub struct Transaction {
    /// The transaction ID callers route operations with.
    pub id: String,

    /// The live version this transaction was started against.
    pub base_version: u64,

    /// The staged document; never aliased with the live document.
    pub document: Document,

    /// On-disk staging file, named by the transaction ID.
    pub staging_path: PathBuf,

    /// Current lifecycle state.
    pub status: TransactionStatus,
}

impl Transaction {
    /// Rewrites the staging file from the staged document.
    ///
    /// Called after every edit so interrupted transactions can be
    /// replayed across restarts.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::WriteStaging`] on I/O failure.
    pub fn persist(&self) -> Result<(), TransactionError> {
        atomic_write(&self.staging_path, &self.document.render(TimeFormat::None)).map_err(
            |source| TransactionError::WriteStaging {
                path: self.staging_path.clone(),
                source,
            },
        )
    }
}

/// Registry of active transactions, keyed by ID.
#[derive(Debug)]
pub struct TransactionStore {
    dir: PathBuf,
    active: Mutex<HashMap<String, Arc<Mutex<Transaction>>>>,
}

impl TransactionStore {
    /// Opens the store rooted at the given transactions directory,
    /// creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::WriteStaging`] when the directory
    /// cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TransactionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| TransactionError::WriteStaging {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            active: Mutex::new(HashMap::new()),
        })
    }

    /// Replays interrupted transactions left on disk by a previous run.
    ///
    /// Each staging file is re-parsed and re-registered under its
    /// filename as the transaction ID, with the base version recovered
    /// from the staged document's pragma. Unreadable or unparsable
    /// staging files are removed and logged rather than failing startup.
    ///
    /// Returns the IDs that were restored.
    pub fn replay(&self, kind: FileKind) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut restored = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };

            let document = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| Document::parse(&text, kind).map_err(|e| e.to_string()));

            match document {
                Ok(document) => {
                    let base_version = document.version();
                    let transaction = Transaction {
                        id: id.clone(),
                        base_version,
                        document,
                        staging_path: path,
                        status: TransactionStatus::Active,
                    };
                    if self.insert(transaction).is_ok() {
                        debug!(id = %id, base_version, "replayed in-progress transaction");
                        restored.push(id);
                    }
                }
                Err(reason) => {
                    warn!(staging = %path.display(), %reason, "dropping unreadable staging file");
                    let _ = fs::remove_file(&path);
                }
            }
        }
        restored
    }

    /// Starts a new transaction over a snapshot of the given document.
    ///
    /// Writes the staging file before registering the transaction so a
    /// crash between the two leaves a replayable file rather than a
    /// registered transaction with no backing copy.
    ///
    /// # Errors
    ///
    /// Returns `WriteStaging` on I/O failure or `AlreadyExists` on an
    /// ID collision.
    pub fn begin(&self, document: Document, base_version: u64) -> Result<String, TransactionError> {
        let id = Uuid::new_v4().to_string();
        let transaction = Transaction {
            staging_path: self.dir.join(&id),
            id: id.clone(),
            base_version,
            document,
            status: TransactionStatus::Active,
        };
        transaction.persist()?;
        self.insert(transaction)?;
        debug!(id = %id, base_version, "started transaction");
        Ok(id)
    }

    fn insert(&self, transaction: Transaction) -> Result<(), TransactionError> {
        let mut active = self.active.lock().expect("transaction map lock poisoned");
        if active.contains_key(&transaction.id) {
            return Err(TransactionError::AlreadyExists {
                id: transaction.id.clone(),
            });
        }
        active.insert(transaction.id.clone(), Arc::new(Mutex::new(transaction)));
        Ok(())
    }

    /// Looks up an active transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotFound`] for an unknown ID.
    pub fn get(&self, id: &str) -> Result<Arc<Mutex<Transaction>>, TransactionError> {
        self.active
            .lock()
            .expect("transaction map lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| TransactionError::NotFound { id: id.to_string() })
    }

    /// Deregisters a transaction and deletes its staging file.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotFound`] for an unknown ID. A
    /// failure to delete the staging file is logged, not surfaced: the
    /// transaction is already gone from the registry.
    pub fn remove(&self, id: &str, status: TransactionStatus) -> Result<(), TransactionError> {
        let transaction = self
            .active
            .lock()
            .expect("transaction map lock poisoned")
            .remove(id)
            .ok_or_else(|| TransactionError::NotFound { id: id.to_string() })?;

        let mut transaction = transaction.lock().expect("transaction lock poisoned");
        transaction.status = status;
        if let Err(e) = fs::remove_file(&transaction.staging_path) {
            warn!(
                staging = %transaction.staging_path.display(),
                error = %e,
                "could not delete staging file"
            );
        }
        debug!(id = %id, ?status, "removed transaction");
        Ok(())
    }

    /// IDs of all currently active transactions.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.active
            .lock()
            .expect("transaction map lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

/// Writes a file atomically: write to `<path>.tmp`, fsync, then rename.
///
/// A crash mid-commit leaves either the old or the new content, never a
/// partial file. The temp file is fsynced before the rename; the parent
/// directory is not.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Append .tmp instead of replacing the extension to avoid clashing
    // with sibling files.
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}
