//! Line tokenization for the HAProxy configuration language.
//!
//! Splits a raw configuration line into whitespace-separated tokens with
//! support for quoted segments, and extracts any trailing `#` comment.

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// A configuration line split into tokens plus its trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// Whitespace-separated tokens with quoting resolved.
    pub tokens: Vec<String>,

    /// Trailing comment text (without the `#`), trimmed.
    pub comment: Option<String>,
}

impl TokenizedLine {
    /// Returns `true` if the line carried no tokens (blank or comment-only).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Splits a configuration line into tokens and a trailing comment.
///
/// Rules:
/// - Tokens are separated by runs of spaces or tabs.
/// - Double quotes group a segment; `\"` and `\\` are unescaped inside.
/// - Single quotes group a segment literally (no escapes).
/// - An unquoted `#` starts the trailing comment; a `#` inside quotes
///   is part of the token.
/// - An unterminated quote consumes the rest of the line into the token.
#[must_use]
pub fn tokenize(line: &str) -> TokenizedLine {
    let mut tokens = Vec::new();
    let mut comment = None;

    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '#' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                }
                let rest: String = chars.collect();
                let text = rest.trim();
                if !text.is_empty() {
                    comment = Some(text.to_string());
                }
                return TokenizedLine { tokens, comment };
            }
            '"' => {
                in_token = true;
                while let Some(qc) = chars.next() {
                    match qc {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => break,
                        },
                        other => current.push(other),
                    }
                }
            }
            '\'' => {
                in_token = true;
                for qc in chars.by_ref() {
                    if qc == '\'' {
                        break;
                    }
                    current.push(qc);
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    TokenizedLine { tokens, comment }
}

/// Quotes a token for serialization when it contains characters that
/// would not survive re-tokenization (whitespace or `#`).
///
/// Plain tokens are returned unchanged so that untouched directives
/// round-trip byte-for-byte.
#[must_use]
pub fn quote_token(token: &str) -> String {
    if token.is_empty() || token.contains([' ', '\t', '#', '"']) {
        let escaped = token.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        token.to_string()
    }
}
