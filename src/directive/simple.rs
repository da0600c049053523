//! Scalar and list directive kinds: options, timeouts, modes, logging,
//! ACL declarations, and backend selection.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::quote_token;

use super::cond::Condition;
use super::duration::{TimeFormat, TimeValue};
use super::error::ParseError;

/// A boolean-like `option` directive with three-state semantics.
///
/// Presence without negation enables the option, a `no` prefix disables
/// it, and total absence from the section means inherited/default.
/// Callers distinguish "disabled" from "not set" by whether the
/// directive exists at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleOption {
    /// Option name, e.g. `httplog` or `dontlognull`.
    pub name: String,

    /// Extra arguments for valued options (`option httpchk GET /health`).
    pub args: Vec<String>,

    /// `true` when written with the `no` prefix.
    pub no: bool,
}

impl SimpleOption {
    pub(crate) const PARSER: &'static str = "SimpleOption";

    /// Parses the tokens after `option` (or after `no option`).
    pub(crate) fn parse(no: bool, args: &[String], line: &str) -> Result<Self, ParseError> {
        let [name, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            name: name.clone(),
            args: rest.to_vec(),
            no,
        })
    }
}

impl fmt::Display for SimpleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no {
            write!(f, "no option {}", self.name)?;
        } else {
            write!(f, "option {}", self.name)?;
        }
        for arg in &self.args {
            write!(f, " {}", quote_token(arg))?;
        }
        Ok(())
    }
}

/// A `timeout <kind> <value>` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeout {
    /// Timeout kind: `client`, `server`, `connect`, `check`, ...
    pub kind: String,

    /// The timer value, normalized to milliseconds.
    pub value: TimeValue,
}

impl Timeout {
    pub(crate) const PARSER: &'static str = "Timeout";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [kind, value] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            kind: kind.clone(),
            value: TimeValue::parse(Self::PARSER, value)?,
        })
    }

    pub(crate) fn render(&self, time_format: TimeFormat) -> String {
        format!("timeout {} {}", self.kind, self.value.format(time_format))
    }
}

/// A `mode http|tcp|log` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode {
    /// The processing mode.
    pub mode: String,
}

impl Mode {
    pub(crate) const PARSER: &'static str = "Mode";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [mode] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        match mode.as_str() {
            "http" | "tcp" | "log" => Ok(Self { mode: mode.clone() }),
            other => Err(ParseError::InvalidValue {
                parser: Self::PARSER,
                value: other.to_string(),
                reason: "expected 'http', 'tcp', or 'log'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode {}", self.mode)
    }
}

/// A `maxconn <number>` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maxconn {
    /// Maximum concurrent connections.
    pub value: u64,
}

impl Maxconn {
    pub(crate) const PARSER: &'static str = "Maxconn";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [value] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        let value = value.parse().map_err(|_| ParseError::InvalidValue {
            parser: Self::PARSER,
            value: value.clone(),
            reason: "expected an integer".to_string(),
        })?;
        Ok(Self { value })
    }
}

impl fmt::Display for Maxconn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maxconn {}", self.value)
    }
}

/// A `balance <algorithm> [args...]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Load-balancing algorithm, e.g. `roundrobin` or `hdr`.
    pub algorithm: String,

    /// Algorithm arguments, verbatim.
    pub args: Vec<String>,
}

impl Balance {
    pub(crate) const PARSER: &'static str = "Balance";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [algorithm, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            algorithm: algorithm.clone(),
            args: rest.to_vec(),
        })
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "balance {}", self.algorithm)?;
        for arg in &self.args {
            write!(f, " {}", quote_token(arg))?;
        }
        Ok(())
    }
}

/// A `log` directive: either `log global` or a concrete log target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Log {
    /// `true` for the `log global` form.
    pub global: bool,

    /// Target address for a concrete target, e.g. `127.0.0.1:514`.
    pub address: Option<String>,

    /// Facility and optional level/minlevel tokens, verbatim.
    pub params: Vec<String>,
}

impl Log {
    pub(crate) const PARSER: &'static str = "Log";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        match args {
            [only] if only == "global" => Ok(Self {
                global: true,
                address: None,
                params: Vec::new(),
            }),
            [address, params @ ..] if !params.is_empty() => Ok(Self {
                global: false,
                address: Some(address.clone()),
                params: params.to_vec(),
            }),
            _ => Err(ParseError::not_enough(Self::PARSER, line)),
        }
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            return write!(f, "log global");
        }
        write!(f, "log {}", quote_token(self.address.as_deref().unwrap_or_default()))?;
        for param in &self.params {
            write!(f, " {}", quote_token(param))?;
        }
        Ok(())
    }
}

/// An `acl <name> <criterion> [values...]` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acl {
    /// ACL name referenced by guards.
    pub name: String,

    /// Match criterion, e.g. `path_beg` or `src`.
    pub criterion: String,

    /// Flags and match values, verbatim.
    pub values: Vec<String>,
}

impl Acl {
    pub(crate) const PARSER: &'static str = "Acl";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [name, criterion, values @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            name: name.clone(),
            criterion: criterion.clone(),
            values: values.to_vec(),
        })
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acl {} {}", self.name, self.criterion)?;
        for value in &self.values {
            write!(f, " {}", quote_token(value))?;
        }
        Ok(())
    }
}

/// A `default_backend <name>` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultBackend {
    /// Name of the backend to route to by default.
    pub name: String,
}

impl DefaultBackend {
    pub(crate) const PARSER: &'static str = "DefaultBackend";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [name] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self { name: name.clone() })
    }
}

impl fmt::Display for DefaultBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "default_backend {}", self.name)
    }
}

/// A `use_backend <name> [if|unless <cond>]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseBackend {
    /// Name of the backend to select.
    pub name: String,

    /// Optional ACL guard.
    pub cond: Option<Condition>,
}

impl UseBackend {
    pub(crate) const PARSER: &'static str = "UseBackend";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [name, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            name: name.clone(),
            cond: Condition::parse(Self::PARSER, rest, line)?,
        })
    }
}

impl fmt::Display for UseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "use_backend {}", self.name)?;
        if let Some(cond) = &self.cond {
            write!(f, " {cond}")?;
        }
        Ok(())
    }
}
