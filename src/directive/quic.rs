//! `quic-initial` rule family.
//!
//! Rules evaluated against QUIC Initial packets before any stream
//! processing. Each variant is a bare action with an optional ACL guard,
//! so a lone variant token is valid while a guard keyword without an
//! expression is an arity error.

use std::fmt;

use serde::Serialize;

use super::cond::Condition;
use super::error::ParseError;

/// The action taken on a matching QUIC Initial packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuicInitialAction {
    /// Accept the packet.
    Accept,
    /// Reject the connection attempt.
    Reject,
    /// Silently drop the datagram.
    DgramDrop,
    /// Force the client through a retry round-trip.
    SendRetry,
}

impl QuicInitialAction {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::DgramDrop => "dgram-drop",
            Self::SendRetry => "send-retry",
        }
    }
}

/// A `quic-initial <action> [if|unless <cond>]` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuicInitial {
    /// The action variant.
    pub action: QuicInitialAction,

    /// Optional ACL guard.
    pub cond: Option<Condition>,
}

impl QuicInitial {
    pub(crate) const PARSER: &'static str = "QuicInitial";

    pub(crate) fn parse(args: &[String], line: &str) -> Result<Self, ParseError> {
        let [variant, rest @ ..] = args else {
            return Err(ParseError::not_enough(Self::PARSER, line));
        };

        let action = match variant.as_str() {
            "accept" => QuicInitialAction::Accept,
            "reject" => QuicInitialAction::Reject,
            "dgram-drop" => QuicInitialAction::DgramDrop,
            "send-retry" => QuicInitialAction::SendRetry,
            other => {
                return Err(ParseError::UnknownVariant {
                    parser: Self::PARSER,
                    variant: other.to_string(),
                    line: line.to_string(),
                });
            }
        };

        Ok(Self {
            action,
            cond: Condition::parse(Self::PARSER, rest, line)?,
        })
    }
}

impl fmt::Display for QuicInitial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quic-initial {}", self.action.keyword())?;
        if let Some(cond) = &self.cond {
            write!(f, " {cond}")?;
        }
        Ok(())
    }
}
