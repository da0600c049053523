//! Error types for directive parsing.

use thiserror::Error;

/// Error type for parsing a single configuration directive.
///
/// Every variant names the parser responsible and carries the offending
/// line so callers can report exactly where a configuration is malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The directive keyword is not known to the registry.
    #[error("unknown directive '{keyword}' in line '{line}'")]
    UnknownDirective {
        /// The unrecognized keyword.
        keyword: String,
        /// The full offending line.
        line: String,
    },

    /// A polymorphic directive family received an unknown sub-action.
    #[error("{parser}: unknown variant '{variant}' in line '{line}'")]
    UnknownVariant {
        /// Name of the family parser that performed the dispatch.
        parser: &'static str,
        /// The unrecognized sub-action token.
        variant: String,
        /// The full offending line.
        line: String,
    },

    /// The directive has fewer tokens than its arity floor requires.
    #[error("{parser}: not enough params in line '{line}'")]
    NotEnoughParams {
        /// Name of the parser that rejected the line.
        parser: &'static str,
        /// The full offending line.
        line: String,
    },

    /// A token failed value-level validation.
    #[error("{parser}: invalid value '{value}': {reason}")]
    InvalidValue {
        /// Name of the parser that rejected the value.
        parser: &'static str,
        /// The rejected token.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ParseError {
    /// Creates a `NotEnoughParams` error for the given parser and line.
    pub(crate) fn not_enough(parser: &'static str, line: &str) -> Self {
        Self::NotEnoughParams {
            parser,
            line: line.to_string(),
        }
    }
}
