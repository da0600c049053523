//! Single-pass parsing of configuration text into a [`Document`].

use crate::directive;
use crate::tokenizer::tokenize;

use super::{Document, DocumentError, Entry, FileKind, Scope, Section, SectionKind};
#[cfg(test)]
use super::VERSION_PRAGMA;

/// Attempts to read the version pragma from a comment line.
fn parse_version_pragma(trimmed: &str) -> Option<u64> {
    let rest = trimmed.strip_prefix('#')?.trim_start();
    rest.strip_prefix("_version=")?.trim().parse().ok()
}

/// Whether any line of the text carries a version pragma.
///
/// Used to decide whether a freshly loaded file needs the pragma
/// written back to disk.
pub(crate) fn has_version_pragma(text: &str) -> bool {
    text.lines().any(|line| parse_version_pragma(line.trim()).is_some())
}

impl Document {
    /// Parses configuration text in a single pass.
    ///
    /// Lines are classified as blank/comment (accumulated as the pending
    /// pre-comment block), the version pragma (captured, not stored),
    /// scope markers, section headers, or directive lines dispatched to
    /// the registry. The version defaults to 1 when no pragma is present.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] describing the offending line for any
    /// malformed directive, misplaced scope marker, out-of-place section
    /// kind, or directive outside a section.
    pub fn parse(text: &str, kind: FileKind) -> Result<Self, DocumentError> {
        let mut doc = Self::empty(kind);
        let mut version: Option<u64> = None;
        let mut pending: Vec<String> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                pending.push(String::new());
                continue;
            }

            if trimmed.starts_with('#') {
                if version.is_none() {
                    if let Some(v) = parse_version_pragma(trimmed) {
                        version = Some(v);
                        continue;
                    }
                }
                pending.push(raw.trim_end().to_string());
                continue;
            }

            if let Some(scope_name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                if kind != FileKind::Spoe {
                    return Err(DocumentError::ScopeNotAllowed {
                        line_no,
                        line: trimmed.to_string(),
                    });
                }
                let scope_name = scope_name.trim();
                if scope_name.is_empty() {
                    return Err(DocumentError::MissingSectionName {
                        keyword: "[scope]".to_string(),
                        line_no,
                    });
                }
                let mut scope = Scope::new(scope_name);
                scope.pre_comments = std::mem::take(&mut pending);
                doc.scopes.push(scope);
                continue;
            }

            let tokenized = tokenize(raw);
            let Some(first) = tokenized.tokens.first() else {
                // Tokenizer found only a comment; classified above, so
                // this is unreachable in practice but kept total.
                pending.push(raw.trim_end().to_string());
                continue;
            };

            if let Some(section_kind) = SectionKind::from_token(first) {
                if section_kind.is_spoe() != (kind == FileKind::Spoe) {
                    return Err(DocumentError::SectionNotAllowed {
                        kind: section_kind,
                        line_no,
                    });
                }

                let mut section = match tokenized.tokens.as_slice() {
                    [_] => {
                        if section_kind.name_required() {
                            return Err(DocumentError::MissingSectionName {
                                keyword: first.clone(),
                                line_no,
                            });
                        }
                        Section::new(section_kind, "")
                    }
                    [_, name] => Section::new(section_kind, name.clone()),
                    [_, name, from_kw, parent] if from_kw == "from" => {
                        let mut s = Section::new(section_kind, name.clone());
                        s.from = Some(parent.clone());
                        s
                    }
                    _ => {
                        return Err(DocumentError::Parse {
                            line_no,
                            source: directive::ParseError::InvalidValue {
                                parser: "Section",
                                value: trimmed.to_string(),
                                reason: "malformed section header".to_string(),
                            },
                        });
                    }
                };

                section.pre_comments = std::mem::take(&mut pending);
                section.comment = tokenized.comment;
                // Scopes are never empty: index 0 is the implicit scope.
                doc.scopes.last_mut().expect("implicit scope").sections.push(section);
                continue;
            }

            let parsed = directive::dispatch(&tokenized.tokens, trimmed)
                .map_err(|source| DocumentError::Parse { line_no, source })?;

            let scope = doc.scopes.last_mut().expect("implicit scope");
            let Some(section) = scope.sections.last_mut() else {
                return Err(DocumentError::DirectiveOutsideSection {
                    line_no,
                    line: trimmed.to_string(),
                });
            };
            section.entries.push(Entry {
                pre_comments: std::mem::take(&mut pending),
                directive: parsed,
                comment: tokenized.comment,
            });
        }

        doc.trailing = pending;
        doc.version = version.unwrap_or(1);
        Ok(doc)
    }
}
