//! `http-request` and `http-response` action families.
//!
//! Both directives are polymorphic: the token after the family keyword
//! selects a concrete action variant, and each variant validates its own
//! arity. An unknown sub-action is a structured parse error naming the
//! family parser.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::quote_token;

use super::bind::Param;
use super::cond::Condition;
use super::error::ParseError;

/// Keywords that consume a value token on a `return` action.
const RETURN_VALUED: &[&str] = &["status", "content-type", "string", "lf-string", "file", "lf-file"];

/// A concrete HTTP rule action, shared by the request and response families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum HttpAction {
    /// Stop evaluation and let the message through.
    Allow,

    /// Reject the message, optionally with an explicit status code.
    Deny {
        /// Status code from `deny_status <code>`.
        deny_status: Option<u16>,
    },

    /// Issue a redirect; options kept verbatim (`location /x code 301`).
    Redirect {
        /// Redirect options in written order.
        options: Vec<String>,
    },

    /// Replace or create a header.
    SetHeader {
        /// Header name.
        name: String,
        /// Value format string as tokens, boundaries preserved.
        fmt: Vec<String>,
    },

    /// Append a header.
    AddHeader {
        /// Header name.
        name: String,
        /// Value format string as tokens, boundaries preserved.
        fmt: Vec<String>,
    },

    /// Remove a header.
    DelHeader {
        /// Header name.
        name: String,
    },

    /// Set a variable, `set-var(<scope.name>) <expr>`.
    SetVar {
        /// Variable name including scope, e.g. `txn.my_var`.
        var: String,
        /// Sample expression as tokens, boundaries preserved.
        expr: Vec<String>,
    },

    /// Return a synthetic response.
    Return {
        /// Keyword parameters (`status`, `content-type`, body sources).
        params: Vec<Param>,
    },
}

impl HttpAction {
    /// Parses the action variant and its arguments.
    ///
    /// `args` starts at the sub-action token; any trailing guard has
    /// already been split off by the family parser.
    fn parse(parser: &'static str, args: &[String], line: &str) -> Result<Self, ParseError> {
        let [variant, rest @ ..] = args else {
            return Err(ParseError::not_enough(parser, line));
        };

        // set-var carries its variable name inside the variant token.
        if let Some(var) = variant
            .strip_prefix("set-var(")
            .and_then(|v| v.strip_suffix(')'))
        {
            if rest.is_empty() {
                return Err(ParseError::not_enough(parser, line));
            }
            return Ok(Self::SetVar {
                var: var.to_string(),
                expr: rest.to_vec(),
            });
        }

        match variant.as_str() {
            "allow" => {
                if rest.is_empty() {
                    Ok(Self::Allow)
                } else {
                    Err(ParseError::InvalidValue {
                        parser,
                        value: rest.join(" "),
                        reason: "allow takes no arguments".to_string(),
                    })
                }
            }
            "deny" => match rest {
                [] => Ok(Self::Deny { deny_status: None }),
                [kw, code] if kw == "deny_status" => {
                    let status = code.parse().map_err(|_| ParseError::InvalidValue {
                        parser,
                        value: code.clone(),
                        reason: "expected a status code".to_string(),
                    })?;
                    Ok(Self::Deny {
                        deny_status: Some(status),
                    })
                }
                _ => Err(ParseError::not_enough(parser, line)),
            },
            "redirect" => {
                if rest.is_empty() {
                    return Err(ParseError::not_enough(parser, line));
                }
                Ok(Self::Redirect {
                    options: rest.to_vec(),
                })
            }
            "set-header" | "add-header" => {
                let [name, fmt @ ..] = rest else {
                    return Err(ParseError::not_enough(parser, line));
                };
                if fmt.is_empty() {
                    return Err(ParseError::not_enough(parser, line));
                }
                let name = name.clone();
                let fmt = fmt.to_vec();
                if variant == "set-header" {
                    Ok(Self::SetHeader { name, fmt })
                } else {
                    Ok(Self::AddHeader { name, fmt })
                }
            }
            "del-header" => {
                let [name] = rest else {
                    return Err(ParseError::not_enough(parser, line));
                };
                Ok(Self::DelHeader { name: name.clone() })
            }
            "return" => {
                let mut params = Vec::new();
                let mut iter = rest.iter();
                while let Some(name) = iter.next() {
                    if RETURN_VALUED.contains(&name.as_str()) {
                        let value = iter
                            .next()
                            .ok_or_else(|| ParseError::not_enough(parser, line))?;
                        params.push(Param::Value {
                            name: name.clone(),
                            value: value.clone(),
                        });
                    } else {
                        params.push(Param::Flag { name: name.clone() });
                    }
                }
                Ok(Self::Return { params })
            }
            other => Err(ParseError::UnknownVariant {
                parser,
                variant: other.to_string(),
                line: line.to_string(),
            }),
        }
    }
}

impl fmt::Display for HttpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny { deny_status } => {
                write!(f, "deny")?;
                if let Some(status) = deny_status {
                    write!(f, " deny_status {status}")?;
                }
                Ok(())
            }
            Self::Redirect { options } => {
                write!(f, "redirect")?;
                for option in options {
                    write!(f, " {}", quote_token(option))?;
                }
                Ok(())
            }
            Self::SetHeader { name, fmt } => {
                write!(f, "set-header {}", quote_token(name))?;
                for token in fmt {
                    write!(f, " {}", quote_token(token))?;
                }
                Ok(())
            }
            Self::AddHeader { name, fmt } => {
                write!(f, "add-header {}", quote_token(name))?;
                for token in fmt {
                    write!(f, " {}", quote_token(token))?;
                }
                Ok(())
            }
            Self::DelHeader { name } => write!(f, "del-header {}", quote_token(name)),
            Self::SetVar { var, expr } => {
                write!(f, "set-var({var})")?;
                for token in expr {
                    write!(f, " {}", quote_token(token))?;
                }
                Ok(())
            }
            Self::Return { params } => {
                write!(f, "return")?;
                for param in params {
                    write!(f, " {param}")?;
                }
                Ok(())
            }
        }
    }
}

/// Splits the arguments at the first top-level guard keyword.
fn split_guard(args: &[String]) -> (&[String], &[String]) {
    match args.iter().position(|t| t == "if" || t == "unless") {
        Some(at) => args.split_at(at),
        None => (args, &[]),
    }
}

/// An `http-request <action> [if|unless <cond>]` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    /// The concrete action.
    pub action: HttpAction,

    /// Optional ACL guard.
    pub cond: Option<Condition>,
}

impl HttpRequest {
    pub(crate) const PARSER: &'static str = "HttpRequest";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let (action_args, guard) = split_guard(args);
        Ok(Self {
            action: HttpAction::parse(Self::PARSER, action_args, line)?,
            cond: Condition::parse(Self::PARSER, guard, line)?,
        })
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http-request {}", self.action)?;
        if let Some(cond) = &self.cond {
            write!(f, " {cond}")?;
        }
        Ok(())
    }
}

/// An `http-response <action> [if|unless <cond>]` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    /// The concrete action.
    pub action: HttpAction,

    /// Optional ACL guard.
    pub cond: Option<Condition>,
}

impl HttpResponse {
    pub(crate) const PARSER: &'static str = "HttpResponse";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let (action_args, guard) = split_guard(args);
        Ok(Self {
            action: HttpAction::parse(Self::PARSER, action_args, line)?,
            cond: Condition::parse(Self::PARSER, guard, line)?,
        })
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http-response {}", self.action)?;
        if let Some(cond) = &self.cond {
            write!(f, " {cond}")?;
        }
        Ok(())
    }
}
