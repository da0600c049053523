//! Error types for document parsing and section operations.

use thiserror::Error;

use super::SectionKind;
use crate::directive::ParseError;

/// Error type for whole-file parsing and section-level operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A directive line failed to parse.
    #[error("parse error at line {line_no}: {source}")]
    Parse {
        /// 1-based line number in the input.
        line_no: usize,
        /// The underlying directive parse error.
        #[source]
        source: ParseError,
    },

    /// A section header keyword was written without its required name.
    #[error("section '{keyword}' requires a name at line {line_no}")]
    MissingSectionName {
        /// The section keyword.
        keyword: String,
        /// 1-based line number in the input.
        line_no: usize,
    },

    /// A `[scope]` marker appeared in a file kind that has no scopes.
    #[error("scope marker not allowed in this file kind at line {line_no}: '{line}'")]
    ScopeNotAllowed {
        /// 1-based line number in the input.
        line_no: usize,
        /// The offending line.
        line: String,
    },

    /// A section keyword is not valid for this file kind.
    #[error("section '{kind}' not allowed in this file kind at line {line_no}")]
    SectionNotAllowed {
        /// The out-of-place section kind.
        kind: SectionKind,
        /// 1-based line number in the input.
        line_no: usize,
    },

    /// A directive appeared before any section header.
    #[error("directive outside of any section at line {line_no}: '{line}'")]
    DirectiveOutsideSection {
        /// 1-based line number in the input.
        line_no: usize,
        /// The offending line.
        line: String,
    },

    /// The requested scope does not exist.
    #[error("scope '{name}' does not exist")]
    ScopeNotFound {
        /// The requested scope name.
        name: String,
    },

    /// The requested section does not exist.
    #[error("section {kind} '{name}' does not exist")]
    SectionNotFound {
        /// The requested section kind.
        kind: SectionKind,
        /// The requested section name.
        name: String,
    },

    /// A section with this kind and name already exists.
    #[error("section {kind} '{name}' already exists")]
    SectionExists {
        /// The conflicting section kind.
        kind: SectionKind,
        /// The conflicting section name.
        name: String,
    },

    /// The requested attribute is absent from the section.
    #[error("attribute '{attribute}' not found in section {kind} '{name}'")]
    AttributeNotFound {
        /// The requested attribute key.
        attribute: String,
        /// The section kind searched.
        kind: SectionKind,
        /// The section name searched.
        name: String,
    },

    /// A set was called with a value whose attribute key does not match
    /// the addressed attribute.
    #[error("attribute mismatch: addressed '{expected}' but value keys as '{actual}'")]
    AttributeMismatch {
        /// The attribute key the caller addressed.
        expected: String,
        /// The key derived from the supplied value.
        actual: String,
    },
}
