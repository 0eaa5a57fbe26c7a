//! Named sensor readings.
//!
//! The sensor driver exposes one small text file per reading. Each file holds
//! a single decimal number, either an integer (`415`) or a float (`24.6`).

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heartbeat counter, incremented once per physical measurement cycle.
pub const HEARTBEAT: &str = "heartbeat";

/// CO2 concentration in ppm.
pub const CO2_CONCENTRATION: &str = "CntR";

/// Ambient temperature.
pub const AMBIENT_TEMPERATURE: &str = "Tamb";

/// Name carried by bus notifications that have no meaningful reading id.
pub const UNKNOWN_READING: &str = "UNKNOWN";

/// A numeric reading value, tagged by how it parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    /// Text parsed completely as a signed integer.
    Integer(i64),

    /// Anything else that parsed as a finite float.
    Float(f64),
}

impl NumericValue {
    /// Parse trimmed text, trying the integer form first.
    ///
    /// The integer path only succeeds when it consumes the entire trimmed
    /// text, so `"24.6"` is a float and never truncated to `24`.
    pub fn parse(text: &str) -> Result<Self, ParseNumericError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseNumericError::Empty);
        }

        if let Ok(v) = trimmed.parse::<i64>() {
            return Ok(NumericValue::Integer(v));
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(NumericValue::Float(v)),
            Ok(_) => Err(ParseNumericError::NonFinite(trimmed.to_string())),
            Err(_) => Err(ParseNumericError::Invalid(trimmed.to_string())),
        }
    }

    /// Value as a float, for consumers that do not care about the tag.
    pub fn as_f64(&self) -> f64 {
        match *self {
            NumericValue::Integer(v) => v as f64,
            NumericValue::Float(v) => v,
        }
    }

    /// Whether the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            NumericValue::Integer(v) => v == 0,
            NumericValue::Float(v) => v == 0.0,
        }
    }
}

impl PartialOrd for NumericValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl FromStr for NumericValue {
    type Err = ParseNumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericValue::parse(s)
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(v) => write!(f, "{}", v),
            NumericValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for NumericValue {
    fn from(v: i64) -> Self {
        NumericValue::Integer(v)
    }
}

impl From<f64> for NumericValue {
    fn from(v: f64) -> Self {
        NumericValue::Float(v)
    }
}

/// Why a reading's text did not parse as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumericError {
    #[error("empty value")]
    Empty,

    #[error("not a number: {0:?}")]
    Invalid(String),

    #[error("not a finite number: {0:?}")]
    NonFinite(String),
}

/// Errors reading a named value from the sensor directory.
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("failed to read '{name}' from {}: {source}", path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseNumericError,
    },
}

impl ReadingError {
    /// Name of the reading that failed.
    pub fn name(&self) -> &str {
        match self {
            ReadingError::Io { name, .. } | ReadingError::Parse { name, .. } => name,
        }
    }
}

/// A named scalar read from the sensor directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Reading identifier (file name), e.g. `CntR`.
    pub name: String,

    /// Exact file contents at read time.
    pub raw_text: String,

    /// Parsed value.
    pub value: NumericValue,
}

impl Reading {
    /// Build a reading from raw file contents.
    pub fn parse(name: impl Into<String>, raw_text: impl Into<String>) -> Result<Self, ReadingError> {
        let name = name.into();
        let raw_text = raw_text.into();

        match NumericValue::parse(&raw_text) {
            Ok(value) => Ok(Self {
                name,
                raw_text,
                value,
            }),
            Err(source) => Err(ReadingError::Parse { name, source }),
        }
    }
}
