//! Error types for settings parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for settings operations.
///
/// Covers errors from parsing, validation, and settings file I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read settings file '{}': {source}", path.display())]
    FileRead {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML settings.
    #[error("Failed to parse TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write the settings file (for the init command).
    #[error("Failed to write settings file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or settings file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid timer serialization preference.
    #[error("Invalid time format '{value}': {reason}")]
    InvalidTimeFormat {
        /// The invalid value provided
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid configuration file dialect.
    #[error("Invalid file kind '{value}': expected haproxy or spoe")]
    InvalidFileKind {
        /// The invalid value provided
        value: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The configuration file path field.
    pub const FILE: &str = "file";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
