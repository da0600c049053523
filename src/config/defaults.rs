//! Default values for tool settings.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

/// Default configuration file dialect.
pub const FILE_KIND: &str = "haproxy";

/// Default timer serialization preference.
pub const TIME_FORMAT: &str = "none";

/// Default number of rotated backups to retain.
pub const BACKUP_RETENTION: usize = crate::client::DEFAULT_BACKUP_RETENTION;

/// Filename of the settings file looked up in the user config directory.
pub const SETTINGS_FILE: &str = "hacfg.toml";
