//! Optional `if`/`unless` guard shared by conditional directives.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::quote_token;

use super::error::ParseError;

/// An ACL guard attached to a directive: `if <expr>` or `unless <expr>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// The condition keyword, `if` or `unless`.
    pub cond: String,

    /// The condition expression tokens. Kept as tokens, not a joined
    /// string, so quoted segments keep their boundaries on render.
    pub cond_test: Vec<String>,
}

impl Condition {
    /// Parses an optional trailing guard from the remaining tokens.
    ///
    /// - no tokens: no guard, `Ok(None)`
    /// - one token: a guard keyword with no expression, arity error
    /// - `if`/`unless` plus expression: guard populated
    ///
    /// # Errors
    ///
    /// Returns `NotEnoughParams` for a lone guard keyword and
    /// `InvalidValue` for a keyword other than `if`/`unless`.
    pub fn parse(
        parser: &'static str,
        tokens: &[String],
        line: &str,
    ) -> Result<Option<Self>, ParseError> {
        let Some(keyword) = tokens.first() else {
            return Ok(None);
        };

        if keyword != "if" && keyword != "unless" {
            return Err(ParseError::InvalidValue {
                parser,
                value: keyword.clone(),
                reason: "expected 'if' or 'unless'".to_string(),
            });
        }

        if tokens.len() < 2 {
            return Err(ParseError::not_enough(parser, line));
        }

        Ok(Some(Self {
            cond: keyword.clone(),
            cond_test: tokens[1..].to_vec(),
        }))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cond)?;
        for token in &self.cond_test {
            write!(f, " {}", quote_token(token))?;
        }
        Ok(())
    }
}
