//! Settings layer for hacfg.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML settings file parsing ([`TomlConfig`])
//! - Validated settings ([`ValidatedConfig`])
//! - Settings file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Settings values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML settings file** - Values from `--config`, or the file in the
//!    user config directory when present
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The configuration file path (`--file` / `file.path`) is the only
//! required value; everything else has a default. The staging and backup
//! directories default to siblings of the configuration file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, FileKindArg};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
