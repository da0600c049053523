//! Directives specific to SPOE (Stream Processing Offload Engine)
//! configuration files: message wiring inside agent, message, and group
//! sections.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::quote_token;

use super::cond::Condition;
use super::error::ParseError;

/// A `messages <name...>` directive inside an agent or group section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Messages {
    /// Message names in written order.
    pub names: Vec<String>,
}

impl Messages {
    pub(crate) const PARSER: &'static str = "Messages";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        if args.is_empty() {
            return Err(ParseError::not_enough(Self::PARSER, line));
        }
        Ok(Self {
            names: args.to_vec(),
        })
    }
}

impl fmt::Display for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "messages")?;
        for name in &self.names {
            write!(f, " {}", quote_token(name))?;
        }
        Ok(())
    }
}

/// An `args <name=expr...>` directive inside a message section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Args {
    /// Argument bindings, verbatim (`ip=src`, `cert=ssl_c_der`).
    pub items: Vec<String>,
}

impl Args {
    pub(crate) const PARSER: &'static str = "Args";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        if args.is_empty() {
            return Err(ParseError::not_enough(Self::PARSER, line));
        }
        Ok(Self {
            items: args.to_vec(),
        })
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "args")?;
        for item in &self.items {
            write!(f, " {}", quote_token(item))?;
        }
        Ok(())
    }
}

/// An `event <name> [if|unless <cond>]` directive inside a message section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event name, e.g. `on-client-session`.
    pub name: String,

    /// Optional ACL guard.
    pub cond: Option<Condition>,
}

impl Event {
    pub(crate) const PARSER: &'static str = "Event";

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

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}", self.name)?;
        if let Some(cond) = &self.cond {
            write!(f, " {cond}")?;
        }
        Ok(())
    }
}

/// A `groups <name...>` directive inside an agent section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Groups {
    /// Group names in written order.
    pub names: Vec<String>,
}

impl Groups {
    pub(crate) const PARSER: &'static str = "Groups";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        if args.is_empty() {
            return Err(ParseError::not_enough(Self::PARSER, line));
        }
        Ok(Self {
            names: args.to_vec(),
        })
    }
}

impl fmt::Display for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "groups")?;
        for name in &self.names {
            write!(f, " {}", quote_token(name))?;
        }
        Ok(())
    }
}
