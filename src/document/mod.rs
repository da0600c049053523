//! In-memory model of one configuration file.
//!
//! A [`Document`] owns ordered scopes, each owning ordered sections,
//! each owning an ordered directive list. Ordering and comments are
//! preserved so that serializing a freshly parsed, unmodified document
//! reproduces the original text.

mod error;
mod parser;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
#[cfg(test)]
mod parser_tests;

use std::fmt;

use serde::Serialize;

pub use error::DocumentError;
pub(crate) use parser::has_version_pragma;

use crate::directive::{Directive, TimeFormat};

/// The version pragma prefix as it appears on disk.
///
/// The exact textual form `# _version=N` is a compatibility contract
/// with other tooling reading the same files; it must not change.
pub(crate) const VERSION_PRAGMA: &str = "# _version=";

/// Which configuration dialect a file uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileKind {
    /// The main HAProxy configuration file.
    #[default]
    Haproxy,
    /// An SPOE configuration file, which supports `[scope]` markers.
    Spoe,
}

/// Section kinds of the configuration language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Process-wide settings; singleton, unnamed.
    Global,
    /// Shared defaults; name is optional.
    Defaults,
    /// A frontend proxy.
    Frontend,
    /// A backend pool.
    Backend,
    /// A combined frontend/backend.
    Listen,
    /// A peers synchronization group.
    Peers,
    /// A DNS resolvers group.
    Resolvers,
    /// An email alert group.
    Mailers,
    /// A userlist for authentication.
    Userlist,
    /// An external program managed by the master process.
    Program,
    /// A ring buffer for log forwarding.
    Ring,
    /// An SPOE agent.
    SpoeAgent,
    /// An SPOE message.
    SpoeMessage,
    /// An SPOE message group.
    SpoeGroup,
}

impl SectionKind {
    /// Maps a section header keyword to its kind.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "global" => Some(Self::Global),
            "defaults" => Some(Self::Defaults),
            "frontend" => Some(Self::Frontend),
            "backend" => Some(Self::Backend),
            "listen" => Some(Self::Listen),
            "peers" => Some(Self::Peers),
            "resolvers" => Some(Self::Resolvers),
            "mailers" => Some(Self::Mailers),
            "userlist" => Some(Self::Userlist),
            "program" => Some(Self::Program),
            "ring" => Some(Self::Ring),
            "spoe-agent" => Some(Self::SpoeAgent),
            "spoe-message" => Some(Self::SpoeMessage),
            "spoe-group" => Some(Self::SpoeGroup),
            _ => None,
        }
    }

    /// The header keyword as written in configuration text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Defaults => "defaults",
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Listen => "listen",
            Self::Peers => "peers",
            Self::Resolvers => "resolvers",
            Self::Mailers => "mailers",
            Self::Userlist => "userlist",
            Self::Program => "program",
            Self::Ring => "ring",
            Self::SpoeAgent => "spoe-agent",
            Self::SpoeMessage => "spoe-message",
            Self::SpoeGroup => "spoe-group",
        }
    }

    /// Whether a name is required after the keyword.
    ///
    /// `global` is unnamed, `defaults` may be named, the rest must be.
    #[must_use]
    pub const fn name_required(self) -> bool {
        !matches!(self, Self::Global | Self::Defaults)
    }

    /// Whether this kind belongs to SPOE files.
    #[must_use]
    pub const fn is_spoe(self) -> bool {
        matches!(self, Self::SpoeAgent | Self::SpoeMessage | Self::SpoeGroup)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directive entry within a section.
///
/// Comments are part of the entry, not a parallel structure, so the
/// round-trip invariant can be checked structurally: the pre-comment
/// block is re-emitted verbatim above the directive's line and the
/// trailing comment after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Raw lines appearing above the directive: comment lines kept
    /// verbatim, and empty strings standing for blank lines.
    pub pre_comments: Vec<String>,

    /// The typed directive.
    pub directive: Directive,

    /// Trailing same-line comment, if any.
    pub comment: Option<String>,
}

impl Entry {
    /// Creates an entry with no comments.
    #[must_use]
    pub const fn new(directive: Directive) -> Self {
        Self {
            pre_comments: Vec::new(),
            directive,
            comment: None,
        }
    }
}

/// A named or singleton block of directives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// The section kind.
    pub kind: SectionKind,

    /// The section name; empty for singleton kinds.
    pub name: String,

    /// Parent named after `from`, for `defaults ... from <parent>`.
    pub from: Option<String>,

    /// Raw lines appearing above the section header.
    pub pre_comments: Vec<String>,

    /// Trailing comment on the header line, if any.
    pub comment: Option<String>,

    /// Ordered directive entries.
    pub entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(kind: SectionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            from: None,
            pre_comments: Vec::new(),
            comment: None,
            entries: Vec::new(),
        }
    }

    /// Returns the first entry addressed by the attribute key.
    #[must_use]
    pub fn entry(&self, attribute: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.directive.attribute() == attribute)
    }

    fn entry_position(&self, attribute: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.directive.attribute() == attribute)
    }
}

/// A bracket-delimited sub-grouping of sections.
///
/// The main HAProxy file kind has a single unnamed scope; SPOE files may
/// declare several, each owning its own agent/message/group sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    /// Scope name; empty for the implicit scope.
    pub name: String,

    /// Raw lines appearing above the `[name]` marker.
    pub pre_comments: Vec<String>,

    /// Ordered sections.
    pub sections: Vec<Section>,
}

impl Scope {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pre_comments: Vec::new(),
            sections: Vec::new(),
        }
    }
}

/// The full in-memory representation of one configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The configuration dialect.
    pub kind: FileKind,

    /// The version counter from the `# _version=N` pragma.
    version: u64,

    /// Ordered scopes; index 0 is always the implicit scope.
    scopes: Vec<Scope>,

    /// Raw comment/blank lines after the last directive.
    trailing: Vec<String>,
}

impl Document {
    /// Creates an empty document at version 1.
    #[must_use]
    pub fn empty(kind: FileKind) -> Self {
        Self {
            kind,
            version: 1,
            scopes: vec![Scope::new("")],
            trailing: Vec::new(),
        }
    }

    /// The document's version counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Overwrites the version counter.
    pub const fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Increments the version counter by exactly one.
    pub const fn bump_version(&mut self) {
        self.version += 1;
    }

    /// All scopes in insertion order.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    fn scope(&self, name: &str) -> Result<&Scope, DocumentError> {
        self.scopes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DocumentError::ScopeNotFound {
                name: name.to_string(),
            })
    }

    fn scope_mut(&mut self, name: &str) -> Result<&mut Scope, DocumentError> {
        self.scopes
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| DocumentError::ScopeNotFound {
                name: name.to_string(),
            })
    }

    fn find_section(&self, scope: &str, kind: SectionKind, name: &str) -> Result<&Section, DocumentError> {
        self.scope(scope)?
            .sections
            .iter()
            .find(|s| s.kind == kind && s.name == name)
            .ok_or_else(|| DocumentError::SectionNotFound {
                kind,
                name: name.to_string(),
            })
    }

    fn find_section_mut(
        &mut self,
        scope: &str,
        kind: SectionKind,
        name: &str,
    ) -> Result<&mut Section, DocumentError> {
        self.scope_mut(scope)?
            .sections
            .iter_mut()
            .find(|s| s.kind == kind && s.name == name)
            .ok_or_else(|| DocumentError::SectionNotFound {
                kind,
                name: name.to_string(),
            })
    }

    /// Lists the names of all sections of a kind within a scope.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ScopeNotFound`] for an unknown scope.
    pub fn section_names(&self, scope: &str, kind: SectionKind) -> Result<Vec<String>, DocumentError> {
        Ok(self
            .scope(scope)?
            .sections
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.name.clone())
            .collect())
    }

    /// Appends a new empty section.
    ///
    /// A blank separator line is attached above the new header when the
    /// scope already holds sections, matching how the files are written
    /// by hand.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SectionExists`] when the (kind, name)
    /// pair is already present, or `ScopeNotFound`.
    pub fn create_section(
        &mut self,
        scope: &str,
        kind: SectionKind,
        name: &str,
    ) -> Result<(), DocumentError> {
        if self.find_section(scope, kind, name).is_ok() {
            return Err(DocumentError::SectionExists {
                kind,
                name: name.to_string(),
            });
        }
        let scope = self.scope_mut(scope)?;
        let mut section = Section::new(kind, name);
        if !scope.sections.is_empty() {
            section.pre_comments.push(String::new());
        }
        scope.sections.push(section);
        Ok(())
    }

    /// Removes a section and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SectionNotFound`] when absent, or
    /// `ScopeNotFound`.
    pub fn delete_section(
        &mut self,
        scope: &str,
        kind: SectionKind,
        name: &str,
    ) -> Result<(), DocumentError> {
        let scope = self.scope_mut(scope)?;
        let at = scope
            .sections
            .iter()
            .position(|s| s.kind == kind && s.name == name)
            .ok_or_else(|| DocumentError::SectionNotFound {
                kind,
                name: name.to_string(),
            })?;
        scope.sections.remove(at);
        Ok(())
    }

    /// Returns the entry addressed by an attribute key within a section.
    ///
    /// # Errors
    ///
    /// Returns `ScopeNotFound`, `SectionNotFound`, or
    /// [`DocumentError::AttributeNotFound`].
    pub fn get(
        &self,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
    ) -> Result<&Entry, DocumentError> {
        let section = self.find_section(scope, kind, name)?;
        section
            .entry(attribute)
            .ok_or_else(|| DocumentError::AttributeNotFound {
                attribute: attribute.to_string(),
                kind,
                name: name.to_string(),
            })
    }

    /// Sets or removes an attribute within a section.
    ///
    /// With `Some(value)`, the first entry carrying the attribute key is
    /// replaced in place, keeping its position and comments; when absent
    /// the directive is appended at the end of the section. With `None`,
    /// the entry is removed; removing an absent attribute is a no-op,
    /// which makes delete idempotent and lets callers pass through
    /// "field left empty" uniformly.
    ///
    /// # Errors
    ///
    /// Returns `ScopeNotFound`, `SectionNotFound`, or
    /// [`DocumentError::AttributeMismatch`] when the supplied value keys
    /// under a different attribute than the one addressed.
    pub fn set(
        &mut self,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
        value: Option<Directive>,
    ) -> Result<(), DocumentError> {
        let section = self.find_section_mut(scope, kind, name)?;

        match value {
            Some(directive) => {
                let actual = directive.attribute();
                if actual != attribute {
                    return Err(DocumentError::AttributeMismatch {
                        expected: attribute.to_string(),
                        actual,
                    });
                }
                if let Some(at) = section.entry_position(attribute) {
                    section.entries[at].directive = directive;
                } else {
                    section.entries.push(Entry::new(directive));
                }
            }
            None => {
                if let Some(at) = section.entry_position(attribute) {
                    section.entries.remove(at);
                }
            }
        }
        Ok(())
    }

    /// Replaces or clears the trailing comment on an existing entry.
    ///
    /// `set` keeps an entry's comment when the value is replaced; this
    /// is the explicit way to change or drop it. `None` clears the
    /// comment, the directive itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns `ScopeNotFound`, `SectionNotFound`, or
    /// [`DocumentError::AttributeNotFound`] when no entry carries the
    /// attribute key.
    pub fn set_comment(
        &mut self,
        scope: &str,
        kind: SectionKind,
        name: &str,
        attribute: &str,
        comment: Option<String>,
    ) -> Result<(), DocumentError> {
        let section = self.find_section_mut(scope, kind, name)?;
        let at = section
            .entry_position(attribute)
            .ok_or_else(|| DocumentError::AttributeNotFound {
                attribute: attribute.to_string(),
                kind,
                name: name.to_string(),
            })?;
        section.entries[at].comment = comment;
        Ok(())
    }

    /// Renders the document back to configuration text.
    ///
    /// The version pragma is emitted first, then scopes and sections in
    /// insertion order. Directive lines are indented with two spaces;
    /// pre-comment lines are emitted verbatim.
    #[must_use]
    pub fn render(&self, time_format: TimeFormat) -> String {
        let mut out = String::new();
        out.push_str(VERSION_PRAGMA);
        out.push_str(&self.version.to_string());
        out.push('\n');

        for scope in &self.scopes {
            for line in &scope.pre_comments {
                out.push_str(line);
                out.push('\n');
            }
            if !scope.name.is_empty() {
                out.push('[');
                out.push_str(&scope.name);
                out.push_str("]\n");
            }
            for section in &scope.sections {
                for line in &section.pre_comments {
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(section.kind.as_str());
                if !section.name.is_empty() {
                    out.push(' ');
                    out.push_str(&section.name);
                }
                if let Some(from) = &section.from {
                    out.push_str(" from ");
                    out.push_str(from);
                }
                if let Some(comment) = &section.comment {
                    out.push_str(" # ");
                    out.push_str(comment);
                }
                out.push('\n');

                for entry in &section.entries {
                    for line in &entry.pre_comments {
                        out.push_str(line);
                        out.push('\n');
                    }
                    out.push_str("  ");
                    out.push_str(&entry.directive.render(time_format));
                    if let Some(comment) = &entry.comment {
                        out.push_str(" # ");
                        out.push_str(comment);
                    }
                    out.push('\n');
                }
            }
        }

        for line in &self.trailing {
            out.push_str(line);
            out.push('\n');
        }

        out
    }
}
