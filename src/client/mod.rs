//! The configuration client: the single entry point tying the document
//! model to the transaction store.
//!
//! A [`ConfigClient`] owns the live in-memory document (authoritative
//! between commits), the on-disk configuration file, and the store of
//! active transactions. Reads and edits are routed by transaction ID:
//! `None` targets the live document, `Some(id)` a staged copy. Edits to
//! the live document run through a short-lived internal transaction so
//! every change follows the same staged-write-commit path.

mod error;
mod params;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::fs;
use std::sync::RwLock;

use tracing::{info, warn};

pub use error::ClientError;
pub use params::{ClientParams, DEFAULT_BACKUP_RETENTION};

use crate::directive::Directive;
use crate::document::{self, Document, DocumentError, Entry, SectionKind};
use crate::transaction::{
    TransactionError, TransactionStatus, TransactionStore, atomic_write, backup,
};

/// Versioned, transactional access to one configuration file.
#[derive(Debug)]
pub struct ConfigClient {
    params: ClientParams,
    live: RwLock<Document>,
    store: TransactionStore,
}

impl ConfigClient {
    /// Loads the configuration file and prepares the client.
    ///
    /// A file without a version pragma is treated as version 1 and
    /// rewritten so the pragma lands on disk. Staging files left behind
    /// by a previous run are replayed into active transactions.
    ///
    /// # Errors
    ///
    /// Returns an error when the parameters are invalid, the file
    /// cannot be read or written, or its content does not parse. A
    /// corrupt configuration file is fatal by design: editing on top of
    /// a half-understood file would destroy the parts that did not
    /// parse.
    pub fn new(params: ClientParams) -> Result<Self, ClientError> {
        params.validate()?;

        let text = fs::read_to_string(&params.config_file).map_err(|source| {
            TransactionError::ReadConfig {
                path: params.config_file.clone(),
                source,
            }
        })?;
        let live = Document::parse(&text, params.file_kind)?;

        if !document::has_version_pragma(&text) {
            atomic_write(&params.config_file, &live.render(params.time_format)).map_err(
                |source| TransactionError::WriteConfig {
                    path: params.config_file.clone(),
                    source,
                },
            )?;
            info!(
                config = %params.config_file.display(),
                "no version pragma found; bootstrapped file at version 1"
            );
        }

        let store = TransactionStore::open(&params.transactions_dir)?;
        let replayed = store.replay(params.file_kind);
        if !replayed.is_empty() {
            info!(count = replayed.len(), "replayed in-progress transactions");
        }

        Ok(Self {
            params,
            live: RwLock::new(live),
            store,
        })
    }

    /// The parameters this client was built with.
    #[must_use]
    pub const fn params(&self) -> &ClientParams {
        &self.params
    }

    /// The version of the live document, or the base version of a
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotFound`] for an unknown ID.
    pub fn version(&self, transaction: Option<&str>) -> Result<u64, ClientError> {
        match transaction {
            Some(id) => {
                let handle = self.store.get(id)?;
                let tx = handle.lock().expect("transaction lock poisoned");
                Ok(tx.base_version)
            }
            None => Ok(self.live_read().version()),
        }
    }

    /// IDs of all active transactions.
    #[must_use]
    pub fn transactions(&self) -> Vec<String> {
        self.store.ids()
    }

    /// Starts a transaction over a snapshot of the live document.
    ///
    /// The caller supplies the version it believes is live; a stale
    /// value is rejected up front rather than at commit time.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::VersionMismatch`] on a stale base
    /// version, or a staging write failure.
    pub fn start_transaction(&self, base_version: u64) -> Result<String, ClientError> {
        let live = self.live_read();
        if base_version != live.version() {
            return Err(TransactionError::VersionMismatch {
                base: base_version,
                live: live.version(),
            }
            .into());
        }
        Ok(self.store.begin(live.clone(), base_version)?)
    }

    /// Commits a transaction, making its staged document live.
    ///
    /// The base version is re-checked against the live version under
    /// the write lock; on a mismatch the transaction stays active so
    /// the caller can inspect or discard it. On success the committed
    /// version is exactly the previous live version plus one, the file
    /// is replaced atomically, and the previous content is rotated into
    /// the backups directory.
    ///
    /// Returns the new live version.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::VersionMismatch`], `NotFound`, or a
    /// file I/O failure.
    pub fn commit_transaction(&self, id: &str) -> Result<u64, ClientError> {
        let mut live = self.live.write().expect("live document lock poisoned");
        self.commit_locked(id, &mut live)
    }

    /// Discards a transaction and deletes its staging file.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotFound`] for an unknown ID.
    pub fn delete_transaction(&self, id: &str) -> Result<(), ClientError> {
        Ok(self.store.remove(id, TransactionStatus::Aborted)?)
    }

    /// Lists the names of all sections of a kind.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown transaction or `ScopeNotFound`
    /// for an unknown scope.
    pub fn sections(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
    ) -> Result<Vec<String>, ClientError> {
        self.read(transaction, |doc| doc.section_names(scope, kind))
    }

    /// Creates a new empty section.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SectionExists`] on a duplicate, or any
    /// transaction/commit failure.
    pub fn create_section(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
        name: &str,
    ) -> Result<(), ClientError> {
        self.edit(transaction, |doc| doc.create_section(scope, kind, name))
    }

    /// Deletes a section and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SectionNotFound`] when absent, or any
    /// transaction/commit failure.
    pub fn delete_section(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
        name: &str,
    ) -> Result<(), ClientError> {
        self.edit(transaction, |doc| doc.delete_section(scope, kind, name))
    }

    /// Returns the entry addressed by an attribute key within a section.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::AttributeNotFound`] when absent, or an
    /// addressing failure.
    pub fn get(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
    ) -> Result<Entry, ClientError> {
        self.read(transaction, |doc| {
            doc.get(scope, kind, name, attribute).cloned()
        })
    }

    /// Sets or removes an attribute within a section.
    ///
    /// `Some(value)` replaces in place or appends; `None` removes, and
    /// removing an absent attribute is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::AttributeMismatch`] when the value keys
    /// under a different attribute, or any transaction/commit failure.
    pub fn set(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
        value: Option<Directive>,
    ) -> Result<(), ClientError> {
        self.edit(transaction, |doc| doc.set(scope, kind, name, attribute, value))
    }

    /// Replaces or clears the trailing comment on an existing entry.
    ///
    /// `set` keeps the comment when a value is replaced; passing `None`
    /// here is the explicit way to drop it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::AttributeNotFound`] when absent, or any
    /// transaction/commit failure.
    pub fn set_comment(
        &self,
        transaction: Option<&str>,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
        comment: Option<String>,
    ) -> Result<(), ClientError> {
        self.edit(transaction, |doc| {
            doc.set_comment(scope, kind, name, attribute, comment)
        })
    }

    /// Renders the live or a staged document to configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotFound`] for an unknown ID.
    pub fn render(&self, transaction: Option<&str>) -> Result<String, ClientError> {
        self.read(transaction, |doc| Ok(doc.render(self.params.time_format)))
    }

    fn live_read(&self) -> std::sync::RwLockReadGuard<'_, Document> {
        self.live.read().expect("live document lock poisoned")
    }

    /// Runs a read-only closure against the addressed document.
    fn read<T, F>(&self, transaction: Option<&str>, f: F) -> Result<T, ClientError>
    where
        F: FnOnce(&Document) -> Result<T, DocumentError>,
    {
        match transaction {
            Some(id) => {
                let handle = self.store.get(id)?;
                let tx = handle.lock().expect("transaction lock poisoned");
                Ok(f(&tx.document)?)
            }
            None => Ok(f(&self.live_read())?),
        }
    }

    /// Runs an editing closure against the addressed document.
    ///
    /// Inside a transaction the staged document is edited and persisted;
    /// the live document is untouched. Without a transaction the edit is
    /// applied to a snapshot and committed immediately through an
    /// internal transaction, so the on-disk file, the version counter,
    /// and the backups behave identically on both paths.
    fn edit<F>(&self, transaction: Option<&str>, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut Document) -> Result<(), DocumentError>,
    {
        match transaction {
            Some(id) => {
                let handle = self.store.get(id)?;
                let mut tx = handle.lock().expect("transaction lock poisoned");
                apply(&mut tx.document)?;
                tx.persist()?;
                Ok(())
            }
            None => {
                let mut live = self.live.write().expect("live document lock poisoned");
                let mut draft = live.clone();
                apply(&mut draft)?;

                let id = self.store.begin(draft, live.version())?;
                if let Err(e) = self.commit_locked(&id, &mut live) {
                    // The internal transaction must not outlive the
                    // failed edit; drop its staging file with it.
                    if let Err(cleanup) = self.store.remove(&id, TransactionStatus::Aborted) {
                        warn!(id = %id, error = %cleanup, "could not discard internal transaction");
                    }
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Commits a transaction while already holding the live write lock.
    ///
    /// Shared by the explicit commit and the internal transactions the
    /// no-transaction edit path creates; the latter would deadlock
    /// re-acquiring the lock it already holds.
    fn commit_locked(&self, id: &str, live: &mut Document) -> Result<u64, ClientError> {
        let handle = self.store.get(id)?;
        let mut committed = {
            let tx = handle.lock().expect("transaction lock poisoned");
            if tx.base_version != live.version() {
                return Err(TransactionError::VersionMismatch {
                    base: tx.base_version,
                    live: live.version(),
                }
                .into());
            }
            tx.document.clone()
        };
        committed.set_version(live.version() + 1);

        let previous = fs::read_to_string(&self.params.config_file).map_err(|source| {
            TransactionError::ReadConfig {
                path: self.params.config_file.clone(),
                source,
            }
        })?;

        atomic_write(
            &self.params.config_file,
            &committed.render(self.params.time_format),
        )
        .map_err(|source| TransactionError::WriteConfig {
            path: self.params.config_file.clone(),
            source,
        })?;

        // The commit is durable at this point; a backup failure is
        // logged, not surfaced.
        if let Err(e) = backup::rotate(
            &self.params.config_file,
            &self.params.backups_dir,
            self.params.backup_retention,
            &previous,
        ) {
            warn!(error = %e, "backup rotation failed after commit");
        }

        let version = committed.version();
        *live = committed;
        self.store.remove(id, TransactionStatus::Committed)?;
        info!(id = %id, version, "committed configuration");
        Ok(version)
    }
}
