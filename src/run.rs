//! Command execution logic.
//!
//! Translates a parsed CLI command into client calls and produces the
//! text printed to stdout.

use std::path::PathBuf;

use thiserror::Error;

use hacfg::client::{ClientError, ConfigClient};
use hacfg::config::{Command, ConfigError, ValidatedConfig, write_default_config};
use hacfg::directive::{Directive, ParseError, parse_directive};
use hacfg::document::{Document, SectionKind};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A client operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A settings operation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configuration file could not be read for validation.
    #[error("Cannot read '{}': {source}", path.display())]
    Read {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file failed to parse during validation.
    #[error("{}: {source}", path.display())]
    Invalid {
        /// Path to the configuration file.
        path: PathBuf,
        /// The parse failure.
        #[source]
        source: hacfg::document::DocumentError,
    },

    /// The section kind given on the command line is not recognized.
    #[error("Unknown section kind '{0}'")]
    UnknownSectionKind(String),

    /// A directive value given on the command line did not parse.
    #[error("Invalid directive '{line}': {source}")]
    InvalidDirective {
        /// The offending line.
        line: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },

    /// Set was called without a value and without `--delete`.
    #[error("set requires a directive value or --delete")]
    MissingValue,

    /// An entry could not be encoded as JSON.
    #[error("Failed to encode entry as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Executes one CLI command and returns the text to print.
///
/// # Errors
///
/// Returns a [`RunError`] describing the first failure; the underlying
/// client guarantees a failed command leaves the file untouched.
pub fn execute(config: &ValidatedConfig, command: &Command) -> Result<String, RunError> {
    match command {
        Command::Init { output } => {
            write_default_config(output)?;
            Ok(format!(
                "Settings template written to: {}",
                output.display()
            ))
        }

        Command::Validate => validate(config),

        Command::Version { transaction } => {
            let client = client(config)?;
            let version = client.version(transaction.as_deref())?;
            Ok(version.to_string())
        }

        Command::Sections {
            section_kind,
            scope,
            transaction,
        } => {
            let client = client(config)?;
            let kind = parse_section_kind(section_kind)?;
            let names = client.sections(transaction.as_deref(), scope, kind)?;
            Ok(names.join("\n"))
        }

        Command::Get {
            section_kind,
            name,
            attribute,
            scope,
            transaction,
            json,
        } => {
            let client = client(config)?;
            let kind = parse_section_kind(section_kind)?;
            let entry = client.get(transaction.as_deref(), scope, kind, name, attribute)?;
            if *json {
                Ok(serde_json::to_string_pretty(&entry)?)
            } else {
                Ok(entry.directive.render(config.time_format))
            }
        }

        Command::Set {
            section_kind,
            name,
            attribute,
            value,
            delete,
            scope,
            transaction,
        } => {
            let client = client(config)?;
            let kind = parse_section_kind(section_kind)?;
            let directive = parse_value(value.as_deref(), *delete)?;
            client.set(transaction.as_deref(), scope, kind, name, attribute, directive)?;
            let version = client.version(transaction.as_deref())?;
            Ok(format!("version {version}"))
        }
    }
}

/// Parses the configuration file without touching it.
///
/// Unlike the client constructor, validation never writes the version
/// pragma back, so it is safe against read-only files.
fn validate(config: &ValidatedConfig) -> Result<String, RunError> {
    let text =
        std::fs::read_to_string(&config.config_file).map_err(|source| RunError::Read {
            path: config.config_file.clone(),
            source,
        })?;

    let document =
        Document::parse(&text, config.file_kind).map_err(|source| RunError::Invalid {
            path: config.config_file.clone(),
            source,
        })?;

    Ok(format!(
        "{}: valid at version {}",
        config.config_file.display(),
        document.version()
    ))
}

fn client(config: &ValidatedConfig) -> Result<ConfigClient, RunError> {
    Ok(ConfigClient::new(config.client_params())?)
}

fn parse_section_kind(token: &str) -> Result<SectionKind, RunError> {
    SectionKind::from_token(token).ok_or_else(|| RunError::UnknownSectionKind(token.to_string()))
}

fn parse_value(value: Option<&str>, delete: bool) -> Result<Option<Directive>, RunError> {
    if delete {
        return Ok(None);
    }
    let line = value.ok_or(RunError::MissingValue)?;
    let parsed = parse_directive(line).map_err(|source| RunError::InvalidDirective {
        line: line.to_string(),
        source,
    })?;
    Ok(Some(parsed.directive))
}
