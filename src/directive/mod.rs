//! Typed configuration directives and the keyword registry.
//!
//! Every supported directive kind is a variant of [`Directive`], parsed
//! from a tokenized line by [`parse_directive`] and rendered back to
//! canonical text via `Display`. Dispatch is a closed match on the
//! directive keyword; polymorphic families (`http-request`,
//! `http-response`, `quic-initial`) dispatch a second time on the
//! sub-action token inside their own parsers, so arity floors are
//! per-variant.

mod bind;
mod cond;
mod duration;
mod error;
mod http;
mod quic;
mod simple;
mod spoe;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::fmt;

use serde::Serialize;

pub use bind::{Bind, Param, Server};
pub use cond::Condition;
pub use duration::{TimeFormat, TimeUnit, TimeValue};
pub use error::ParseError;
pub use http::{HttpAction, HttpRequest, HttpResponse};
pub use quic::{QuicInitial, QuicInitialAction};
pub use simple::{Acl, Balance, DefaultBackend, Log, Maxconn, Mode, SimpleOption, Timeout, UseBackend};
pub use spoe::{Args, Event, Groups, Messages};

use crate::tokenizer::{TokenizedLine, tokenize};

/// One typed configuration directive.
///
/// The enum is the directive registry: adding a kind means adding a
/// variant, a parser arm in [`dispatch`], and a render arm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// `option <name>` / `no option <name>`
    Option(SimpleOption),
    /// `timeout <kind> <value>`
    Timeout(Timeout),
    /// `mode http|tcp|log`
    Mode(Mode),
    /// `maxconn <number>`
    Maxconn(Maxconn),
    /// `balance <algorithm> [args...]`
    Balance(Balance),
    /// `log global` or `log <address> <facility> [...]`
    Log(Log),
    /// `acl <name> <criterion> [values...]`
    Acl(Acl),
    /// `bind <address> [params...]`
    Bind(Bind),
    /// `server <name> <address> [params...]`
    Server(Server),
    /// `default_backend <name>`
    DefaultBackend(DefaultBackend),
    /// `use_backend <name> [if|unless <cond>]`
    UseBackend(UseBackend),
    /// `http-request <action> ...`
    HttpRequest(HttpRequest),
    /// `http-response <action> ...`
    HttpResponse(HttpResponse),
    /// `quic-initial <action> [if|unless <cond>]`
    QuicInitial(QuicInitial),
    /// SPOE `messages <name...>`
    Messages(Messages),
    /// SPOE `args <name=expr...>`
    Args(Args),
    /// SPOE `event <name> [if|unless <cond>]`
    Event(Event),
    /// SPOE `groups <name...>`
    Groups(Groups),
}

impl Directive {
    /// The attribute key this directive is addressed by in get/set calls.
    ///
    /// Singleton directives are keyed by keyword alone (`maxconn`,
    /// `mode`); multi-entry kinds append their distinguishing token
    /// (`timeout client`, `server web1`, `option httplog`). The key is
    /// independent of the `no` prefix so a disabled option is found by
    /// the same attribute as an enabled one.
    #[must_use]
    pub fn attribute(&self) -> String {
        match self {
            Self::Option(o) => format!("option {}", o.name),
            Self::Timeout(t) => format!("timeout {}", t.kind),
            Self::Mode(_) => "mode".to_string(),
            Self::Maxconn(_) => "maxconn".to_string(),
            Self::Balance(_) => "balance".to_string(),
            Self::Log(_) => "log".to_string(),
            Self::Acl(a) => format!("acl {}", a.name),
            Self::Bind(b) => format!("bind {}", b.address),
            Self::Server(s) => format!("server {}", s.name),
            Self::DefaultBackend(_) => "default_backend".to_string(),
            Self::UseBackend(u) => format!("use_backend {}", u.name),
            Self::HttpRequest(_) => "http-request".to_string(),
            Self::HttpResponse(_) => "http-response".to_string(),
            Self::QuicInitial(_) => "quic-initial".to_string(),
            Self::Messages(_) => "messages".to_string(),
            Self::Args(_) => "args".to_string(),
            Self::Event(_) => "event".to_string(),
            Self::Groups(_) => "groups".to_string(),
        }
    }

    /// Renders the canonical line, honoring the timer format preference.
    ///
    /// Only timer-valued directives are sensitive to the preference;
    /// everything else matches `Display` exactly.
    #[must_use]
    pub fn render(&self, time_format: TimeFormat) -> String {
        match self {
            Self::Timeout(t) => t.render(time_format),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option(d) => d.fmt(f),
            Self::Timeout(d) => write!(f, "{}", d.render(TimeFormat::None)),
            Self::Mode(d) => d.fmt(f),
            Self::Maxconn(d) => d.fmt(f),
            Self::Balance(d) => d.fmt(f),
            Self::Log(d) => d.fmt(f),
            Self::Acl(d) => d.fmt(f),
            Self::Bind(d) => d.fmt(f),
            Self::Server(d) => d.fmt(f),
            Self::DefaultBackend(d) => d.fmt(f),
            Self::UseBackend(d) => d.fmt(f),
            Self::HttpRequest(d) => d.fmt(f),
            Self::HttpResponse(d) => d.fmt(f),
            Self::QuicInitial(d) => d.fmt(f),
            Self::Messages(d) => d.fmt(f),
            Self::Args(d) => d.fmt(f),
            Self::Event(d) => d.fmt(f),
            Self::Groups(d) => d.fmt(f),
        }
    }
}

/// A directive parsed from one line, with its trailing comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDirective {
    /// The typed directive.
    pub directive: Directive,

    /// Trailing same-line comment, if any.
    pub comment: Option<String>,
}

impl ParsedDirective {
    /// Returns the comment attached at parse time.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Parses one configuration line into a typed directive.
///
/// # Errors
///
/// Returns a [`ParseError`] for a blank line, an unknown keyword, an
/// unknown sub-action, or a variant-specific arity/value failure.
pub fn parse_directive(line: &str) -> Result<ParsedDirective, ParseError> {
    let TokenizedLine { tokens, comment } = tokenize(line);
    let directive = dispatch(&tokens, line)?;
    Ok(ParsedDirective { directive, comment })
}

/// Keyword dispatch over already-tokenized input.
pub(crate) fn dispatch(tokens: &[String], line: &str) -> Result<Directive, ParseError> {
    let [keyword, args @ ..] = tokens else {
        return Err(ParseError::NotEnoughParams {
            parser: "Registry",
            line: line.to_string(),
        });
    };

    match keyword.as_str() {
        "no" => match args {
            [second, rest @ ..] if second == "option" => {
                Ok(Directive::Option(SimpleOption::parse(true, rest, line)?))
            }
            _ => Err(ParseError::UnknownDirective {
                keyword: tokens.join(" "),
                line: line.to_string(),
            }),
        },
        "option" => Ok(Directive::Option(SimpleOption::parse(false, args, line)?)),
        "timeout" => Ok(Directive::Timeout(Timeout::parse(args, line)?)),
        "mode" => Ok(Directive::Mode(Mode::parse(args, line)?)),
        "maxconn" => Ok(Directive::Maxconn(Maxconn::parse(args, line)?)),
        "balance" => Ok(Directive::Balance(Balance::parse(args, line)?)),
        "log" => Ok(Directive::Log(Log::parse(args, line)?)),
        "acl" => Ok(Directive::Acl(Acl::parse(args, line)?)),
        "bind" => Ok(Directive::Bind(Bind::parse(args, line)?)),
        "server" => Ok(Directive::Server(Server::parse(args, line)?)),
        "default_backend" => Ok(Directive::DefaultBackend(DefaultBackend::parse(args, line)?)),
        "use_backend" => Ok(Directive::UseBackend(UseBackend::parse(args, line)?)),
        "http-request" => Ok(Directive::HttpRequest(HttpRequest::parse(args, line)?)),
        "http-response" => Ok(Directive::HttpResponse(HttpResponse::parse(args, line)?)),
        "quic-initial" => Ok(Directive::QuicInitial(QuicInitial::parse(args, line)?)),
        "messages" => Ok(Directive::Messages(Messages::parse(args, line)?)),
        "args" => Ok(Directive::Args(Args::parse(args, line)?)),
        "event" => Ok(Directive::Event(Event::parse(args, line)?)),
        "groups" => Ok(Directive::Groups(Groups::parse(args, line)?)),
        other => Err(ParseError::UnknownDirective {
            keyword: other.to_string(),
            line: line.to_string(),
        }),
    }
}
