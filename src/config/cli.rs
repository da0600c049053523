//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::document::FileKind;

/// hacfg: transactional HAProxy configuration editor
///
/// Parses, edits, and serializes HAProxy configuration files with
/// round-trip fidelity, optimistic version checks, and rotating backups.
#[derive(Debug, Parser)]
#[command(name = "hacfg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the configuration file to operate on (required)
    #[arg(long, short, global = true)]
    pub file: Option<PathBuf>,

    /// Configuration file dialect
    #[arg(long, value_enum, global = true)]
    pub kind: Option<FileKindArg>,

    /// Directory for in-progress transaction staging files
    #[arg(long = "transactions-dir", global = true)]
    pub transactions_dir: Option<PathBuf>,

    /// Directory for rotated configuration backups
    #[arg(long = "backups-dir", global = true)]
    pub backups_dir: Option<PathBuf>,

    /// Number of backups to retain (0 disables backups)
    #[arg(long = "backup-retention", global = true)]
    pub backup_retention: Option<usize>,

    /// Timer serialization: 'none', 'nearest', or a unit (ms/s/m/h/d)
    #[arg(long = "time-format", value_name = "FORMAT", global = true)]
    pub time_format: Option<String>,

    /// Path to the settings file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for hacfg
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default settings file
    Init {
        /// Output path for the settings file
        #[arg(long, short, default_value = "hacfg.toml")]
        output: PathBuf,
    },

    /// Parse the configuration file and report whether it is valid
    Validate,

    /// Print the configuration version, or a transaction's base version
    Version {
        /// Transaction ID to inspect instead of the live file
        #[arg(long, short)]
        transaction: Option<String>,
    },

    /// List the names of all sections of a kind
    Sections {
        /// Section kind (frontend, backend, listen, ...)
        #[arg(value_name = "KIND")]
        section_kind: String,

        /// Scope name; only meaningful for SPOE files
        #[arg(long, default_value = "")]
        scope: String,

        /// Transaction ID to read from instead of the live file
        #[arg(long, short)]
        transaction: Option<String>,
    },

    /// Print one attribute of a section
    Get {
        /// Section kind (global, frontend, backend, ...)
        #[arg(value_name = "KIND")]
        section_kind: String,

        /// Section name; pass '' for unnamed sections such as global
        name: String,

        /// Attribute key, e.g. 'maxconn' or 'server app1'
        attribute: String,

        /// Scope name; only meaningful for SPOE files
        #[arg(long, default_value = "")]
        scope: String,

        /// Transaction ID to read from instead of the live file
        #[arg(long, short)]
        transaction: Option<String>,

        /// Print the entry as JSON instead of configuration text
        #[arg(long)]
        json: bool,
    },

    /// Set or delete one attribute of a section
    Set {
        /// Section kind (global, frontend, backend, ...)
        #[arg(value_name = "KIND")]
        section_kind: String,

        /// Section name; pass '' for unnamed sections such as global
        name: String,

        /// Attribute key, e.g. 'maxconn' or 'server app1'
        attribute: String,

        /// The full directive line; omit together with --delete
        value: Option<String>,

        /// Remove the attribute instead of setting it
        #[arg(long, conflicts_with = "value")]
        delete: bool,

        /// Scope name; only meaningful for SPOE files
        #[arg(long, default_value = "")]
        scope: String,

        /// Transaction ID to stage into instead of committing immediately
        #[arg(long, short)]
        transaction: Option<String>,
    },
}

/// Configuration file dialect argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKindArg {
    /// The main HAProxy configuration file
    #[value(name = "haproxy")]
    Haproxy,
    /// An SPOE configuration file
    #[value(name = "spoe")]
    Spoe,
}

impl From<FileKindArg> for FileKind {
    fn from(arg: FileKindArg) -> Self {
        match arg {
            FileKindArg::Haproxy => Self::Haproxy,
            FileKindArg::Spoe => Self::Spoe,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
