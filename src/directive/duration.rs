//! Timer value parsing and formatting.
//!
//! HAProxy timers accept human suffixes (`ms`, `s`, `m`, `h`, `d`) and
//! default to milliseconds when bare. Values are normalized to
//! milliseconds internally; the suffix used on serialization is governed
//! by a global [`TimeFormat`] preference.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::ParseError;

/// Time units accepted by HAProxy timer directives, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Milliseconds (HAProxy's native timer unit).
    Ms,
    /// Seconds.
    S,
    /// Minutes.
    M,
    /// Hours.
    H,
    /// Days.
    D,
}

impl TimeUnit {
    /// All units ordered largest to smallest, for `nearest` formatting.
    const DESCENDING: [Self; 5] = [Self::D, Self::H, Self::M, Self::S, Self::Ms];

    /// Number of milliseconds in one unit.
    #[must_use]
    pub const fn millis(self) -> u64 {
        match self {
            Self::Ms => 1,
            Self::S => 1_000,
            Self::M => 60_000,
            Self::H => 3_600_000,
            Self::D => 86_400_000,
        }
    }

    /// The suffix as written in configuration text.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ms => "ms",
            Self::S => "s",
            Self::M => "m",
            Self::H => "h",
            Self::D => "d",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => Ok(Self::Ms),
            "s" => Ok(Self::S),
            "m" => Ok(Self::M),
            "h" => Ok(Self::H),
            "d" => Ok(Self::D),
            _ => Err(()),
        }
    }
}

/// Preference for which suffix timer values are serialized with.
///
/// Invalid preference strings are rejected when the client is configured,
/// not when a value is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// Re-emit each value with the suffix it was parsed with (round-trip).
    #[default]
    None,
    /// Always emit the given unit, falling back to milliseconds when the
    /// value is not a whole number of that unit.
    Unit(TimeUnit),
    /// Emit the largest unit that divides the value with no remainder.
    Nearest,
}

impl TimeFormat {
    /// The preference as a settings-file string, inverse of [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Nearest => "nearest",
            Self::Unit(unit) => unit.suffix(),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "nearest" => Ok(Self::Nearest),
            other => other.parse::<TimeUnit>().map(Self::Unit).map_err(|()| {
                format!("expected 'none', 'nearest', or one of ms/s/m/h/d, got '{other}'")
            }),
        }
    }
}

/// A timer value normalized to milliseconds.
///
/// Remembers the suffix it was written with so untouched values
/// round-trip exactly under [`TimeFormat::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeValue {
    /// The value in milliseconds.
    pub millis: u64,

    /// The unit the value was written in, `None` for a bare number.
    pub unit: Option<TimeUnit>,
}

impl TimeValue {
    /// Creates a timer value from raw milliseconds with no written suffix.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis, unit: None }
    }

    /// Parses a timer token such as `30s`, `500ms`, or a bare `5000`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] for an unknown suffix or a
    /// non-numeric magnitude.
    pub fn parse(parser: &'static str, token: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidValue {
            parser,
            value: token.to_string(),
            reason: reason.to_string(),
        };

        let digits_end = token
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(token.len());
        let (digits, suffix) = token.split_at(digits_end);

        let magnitude: u64 = digits
            .parse()
            .map_err(|_| invalid("expected a timer value"))?;

        let unit = if suffix.is_empty() {
            None
        } else {
            Some(
                suffix
                    .parse::<TimeUnit>()
                    .map_err(|()| invalid("unknown time suffix"))?,
            )
        };

        let millis = magnitude
            .checked_mul(unit.map_or(1, TimeUnit::millis))
            .ok_or_else(|| invalid("timer value overflows"))?;

        Ok(Self { millis, unit })
    }

    /// Renders the value according to the given format preference.
    #[must_use]
    pub fn format(&self, preference: TimeFormat) -> String {
        match preference {
            TimeFormat::None => self.unit.map_or_else(
                || self.millis.to_string(),
                |unit| Self::in_unit(self.millis, unit),
            ),
            TimeFormat::Unit(unit) => {
                if self.millis % unit.millis() == 0 {
                    Self::in_unit(self.millis, unit)
                } else {
                    format!("{}ms", self.millis)
                }
            }
            TimeFormat::Nearest => {
                let unit = TimeUnit::DESCENDING
                    .into_iter()
                    .find(|u| self.millis != 0 && self.millis % u.millis() == 0)
                    .unwrap_or(TimeUnit::Ms);
                Self::in_unit(self.millis, unit)
            }
        }
    }

    fn in_unit(millis: u64, unit: TimeUnit) -> String {
        if millis % unit.millis() == 0 {
            format!("{}{}", millis / unit.millis(), unit.suffix())
        } else {
            // Not a whole number of the written unit; keep milliseconds.
            format!("{millis}ms")
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(TimeFormat::None))
    }
}
