//! Validated settings after merging CLI and TOML sources.
//!
//! This module contains the final, validated settings that are used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::client::ClientParams;
use crate::directive::TimeFormat;
use crate::document::FileKind;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated settings ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML settings. The function validates all inputs and returns errors
/// for invalid combinations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the configuration file to operate on (required)
    pub config_file: PathBuf,

    /// Configuration file dialect
    pub file_kind: FileKind,

    /// Directory for transaction staging files.
    /// If `None`, a sibling of the configuration file is used.
    pub transactions_dir: Option<PathBuf>,

    /// Directory for rotated backups.
    /// If `None`, a sibling of the configuration file is used.
    pub backups_dir: Option<PathBuf>,

    /// Number of backups to retain
    pub backup_retention: usize,

    /// Timer serialization preference
    pub time_format: TimeFormat,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{ file: {}, kind: {:?}, retention: {}, time_format: {} }}",
            self.config_file.display(),
            self.file_kind,
            self.backup_retention,
            self.time_format.as_str(),
        )
    }
}

impl ValidatedConfig {
    /// Creates validated settings from CLI arguments and optional TOML
    /// settings.
    ///
    /// CLI arguments take precedence over TOML values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file path is missing, or
    /// the file kind or time format value is invalid.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let config_file = Self::resolve_config_file(cli, toml)?;
        let file_kind = Self::resolve_file_kind(cli, toml)?;
        let time_format = Self::resolve_time_format(cli, toml)?;

        let transactions_dir = cli
            .transactions_dir
            .clone()
            .or_else(|| toml.and_then(|t| t.transactions.dir.as_deref().map(expand_tilde)));

        let backups_dir = cli
            .backups_dir
            .clone()
            .or_else(|| toml.and_then(|t| t.backups.dir.as_deref().map(expand_tilde)));

        let backup_retention = cli
            .backup_retention
            .or_else(|| toml.and_then(|t| t.backups.retention))
            .unwrap_or(defaults::BACKUP_RETENTION);

        Ok(Self {
            config_file,
            file_kind,
            transactions_dir,
            backups_dir,
            backup_retention,
            time_format,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges settings from CLI and optional settings file.
    ///
    /// An explicit `--config` path must exist; otherwise the settings
    /// file in the user config directory is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed,
    /// or the merged settings are invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            match default_settings_path() {
                Some(path) if path.exists() => Some(TomlConfig::load(&path)?),
                _ => None,
            }
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the client parameters these settings describe.
    #[must_use]
    pub fn client_params(&self) -> ClientParams {
        let mut params = ClientParams::new(&self.config_file)
            .with_backup_retention(self.backup_retention)
            .with_time_format(self.time_format)
            .with_file_kind(self.file_kind);

        if let Some(ref dir) = self.transactions_dir {
            params = params.with_transactions_dir(dir);
        }
        if let Some(ref dir) = self.backups_dir {
            params = params.with_backups_dir(dir);
        }
        params
    }

    fn resolve_config_file(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        // CLI takes precedence
        if let Some(ref path) = cli.file {
            return Ok(path.clone());
        }

        if let Some(toml) = toml {
            if let Some(ref path) = toml.file.path {
                return Ok(expand_tilde(path));
            }
        }

        Err(ConfigError::missing(
            field::FILE,
            "Use --file or set file.path in the settings file",
        ))
    }

    fn resolve_file_kind(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FileKind, ConfigError> {
        if let Some(kind) = cli.kind {
            return Ok(kind.into());
        }

        let kind_str = toml
            .and_then(|t| t.file.kind.as_deref())
            .unwrap_or(defaults::FILE_KIND);

        match kind_str {
            "haproxy" => Ok(FileKind::Haproxy),
            "spoe" => Ok(FileKind::Spoe),
            other => Err(ConfigError::InvalidFileKind {
                value: other.to_string(),
            }),
        }
    }

    fn resolve_time_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<TimeFormat, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let format_str = cli
            .time_format
            .as_deref()
            .or_else(|| toml.and_then(|t| t.format.time.as_deref()))
            .unwrap_or(defaults::TIME_FORMAT);

        format_str
            .parse::<TimeFormat>()
            .map_err(|reason| ConfigError::InvalidTimeFormat {
                value: format_str.to_string(),
                reason,
            })
    }
}

/// Writes the default settings template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The settings file in the user config directory, when resolvable.
fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hacfg").join(defaults::SETTINGS_FILE))
}

/// Expands a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
