//! Listener and server directives with keyword parameter lists.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::quote_token;

use super::error::ParseError;

/// A single keyword parameter on a `bind` or `server` line.
///
/// Parameters are either bare flags (`ssl`, `check`, `backup`) or
/// keyword/value pairs (`maxconn 50`, `weight 10`). Which keywords take
/// a value follows the HAProxy grammar and is table-driven per directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Param {
    /// A bare flag parameter.
    Flag {
        /// The flag keyword.
        name: String,
    },
    /// A keyword followed by one value token.
    Value {
        /// The parameter keyword.
        name: String,
        /// The value token, verbatim.
        value: String,
    },
}

impl Param {
    /// The parameter keyword regardless of shape.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Flag { name } | Self::Value { name, .. } => name,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag { name } => write!(f, "{}", quote_token(name)),
            Self::Value { name, value } => write!(f, "{name} {}", quote_token(value)),
        }
    }
}

/// Parses a parameter list given the set of keywords that take a value.
fn parse_params(
    parser: &'static str,
    tokens: &[String],
    valued: &[&str],
    line: &str,
) -> Result<Vec<Param>, ParseError> {
    let mut params = Vec::new();
    let mut iter = tokens.iter();

    while let Some(name) = iter.next() {
        if valued.contains(&name.as_str()) {
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

    Ok(params)
}

/// A `bind <address> [params...]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bind {
    /// Listening address, e.g. `:80`, `127.0.0.1:8443`, or `/run/x.sock`.
    pub address: String,

    /// Bind parameters in written order.
    pub params: Vec<Param>,
}

impl Bind {
    pub(crate) const PARSER: &'static str = "Bind";

    /// Bind keywords that consume a value token.
    const VALUED: &'static [&'static str] = &[
        "crt",
        "ca-file",
        "alpn",
        "npn",
        "name",
        "maxconn",
        "backlog",
        "interface",
        "mss",
        "namespace",
        "process",
        "thread",
        "verify",
        "mode",
        "user",
        "group",
        "id",
        "nice",
        "ciphers",
        "ciphersuites",
    ];

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [address, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            address: address.clone(),
            params: parse_params(Self::PARSER, rest, Self::VALUED, line)?,
        })
    }

    /// Returns the parameter with the given keyword, if present.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bind {}", quote_token(&self.address))?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// A `server <name> <address> [params...]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    /// Server name, unique within its backend.
    pub name: String,

    /// Target address, host:port or socket path.
    pub address: String,

    /// Server parameters in written order.
    pub params: Vec<Param>,
}

impl Server {
    pub(crate) const PARSER: &'static str = "Server";

    /// Server keywords that consume a value token.
    const VALUED: &'static [&'static str] = &[
        "weight",
        "maxconn",
        "minconn",
        "maxqueue",
        "inter",
        "fastinter",
        "downinter",
        "rise",
        "fall",
        "port",
        "addr",
        "cookie",
        "track",
        "id",
        "slowstart",
        "source",
        "resolvers",
        "resolve-prefer",
        "init-addr",
        "pool-max-conn",
        "pool-purge-delay",
        "proto",
        "sni",
        "verify",
        "ca-file",
        "crt",
        "alpn",
        "npn",
        "error-limit",
        "on-error",
        "observe",
    ];

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [name, address, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };
        Ok(Self {
            name: name.clone(),
            address: address.clone(),
            params: parse_params(Self::PARSER, rest, Self::VALUED, line)?,
        })
    }

    /// Returns the parameter with the given keyword, if present.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server {} {}", quote_token(&self.name), quote_token(&self.address))?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}
