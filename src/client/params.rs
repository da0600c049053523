//! Client construction parameters.

use std::path::{Path, PathBuf};

use crate::directive::TimeFormat;
use crate::document::FileKind;

use super::ClientError;

/// Default number of rotated backups to retain.
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Parameters for constructing a [`super::ConfigClient`].
///
/// The transactions and backups directories default to siblings of the
/// configuration file so a client can be pointed at a single path.
#[derive(Debug, Clone)]
pub struct ClientParams {
    /// Path to the live configuration file.
    pub config_file: PathBuf,

    /// Directory holding one staging file per active transaction.
    pub transactions_dir: PathBuf,

    /// Directory holding rotated `<configfile>.<n>` backups.
    pub backups_dir: PathBuf,

    /// Number of backups to retain; zero disables backups.
    pub backup_retention: usize,

    /// Suffix preference for serializing timer values.
    pub time_format: TimeFormat,

    /// Configuration dialect of the file.
    pub file_kind: FileKind,
}

impl ClientParams {
    /// Creates parameters for a configuration file with defaults for
    /// everything else.
    #[must_use]
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        let config_file = config_file.into();
        let parent = config_file.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        Self {
            transactions_dir: parent.join("transactions"),
            backups_dir: parent.join("backups"),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            time_format: TimeFormat::None,
            file_kind: FileKind::Haproxy,
            config_file,
        }
    }

    /// Overrides the transactions directory.
    #[must_use]
    pub fn with_transactions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.transactions_dir = dir.into();
        self
    }

    /// Overrides the backups directory.
    #[must_use]
    pub fn with_backups_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backups_dir = dir.into();
        self
    }

    /// Overrides the backup retention count.
    #[must_use]
    pub const fn with_backup_retention(mut self, retention: usize) -> Self {
        self.backup_retention = retention;
        self
    }

    /// Overrides the timer serialization preference.
    #[must_use]
    pub const fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    /// Marks the file as an SPOE configuration.
    #[must_use]
    pub const fn with_file_kind(mut self, file_kind: FileKind) -> Self {
        self.file_kind = file_kind;
        self
    }

    /// Validates the parameter combination.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParams`] for an empty config path
    /// or a staging directory that equals the backups directory.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.config_file.as_os_str().is_empty() {
            return Err(ClientError::InvalidParams {
                name: "config_file",
                reason: "path must not be empty".to_string(),
            });
        }
        if self.transactions_dir == self.backups_dir {
            return Err(ClientError::InvalidParams {
                name: "transactions_dir",
                reason: "must differ from backups_dir".to_string(),
            });
        }
        Ok(())
    }
}
