//! TOML settings file parsing.
//!
//! Defines the structure of the settings file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root settings structure from the TOML file.
///
/// All fields are optional to allow partial settings
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Configuration file section
    #[serde(default)]
    pub file: FileSection,

    /// Transaction staging section
    #[serde(default)]
    pub transactions: TransactionsSection,

    /// Backup rotation section
    #[serde(default)]
    pub backups: BackupsSection,

    /// Serialization format section
    #[serde(default)]
    pub format: FormatSection,
}

/// Configuration file settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    /// Path to the configuration file to operate on
    pub path: Option<String>,

    /// File dialect: "haproxy" or "spoe"
    pub kind: Option<String>,
}

/// Transaction staging settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionsSection {
    /// Directory for in-progress transaction staging files
    pub dir: Option<String>,
}

/// Backup rotation settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupsSection {
    /// Directory for rotated configuration backups
    pub dir: Option<String>,

    /// Number of backups to retain (0 disables backups)
    pub retention: Option<usize>,
}

/// Serialization format settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    /// Timer serialization: "none", "nearest", or a unit (ms/s/m/h/d)
    pub time: Option<String>,
}

impl TomlConfig {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default settings file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# hacfg Settings File

[file]
# Path to the configuration file to operate on (required)
# path = "/etc/haproxy/haproxy.cfg"

# File dialect: "haproxy" or "spoe"
# kind = "haproxy"

[transactions]
# Directory for in-progress transaction staging files
# (default: a 'transactions' directory next to the configuration file)
# dir = "/var/lib/hacfg/transactions"

[backups]
# Directory for rotated configuration backups
# (default: a 'backups' directory next to the configuration file)
# dir = "/var/lib/hacfg/backups"

# Number of backups to retain; 0 disables backups (default: 5)
retention = 5

[format]
# Timer serialization preference (default: "none")
# "none"    - keep the suffix each value was written with
# "nearest" - emit the largest unit that divides the value exactly
# ms/s/m/h/d - always emit this unit where possible
# time = "none"
"#
    .to_string()
}
