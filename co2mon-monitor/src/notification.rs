//! Decoding of `NewValue` signal arguments.

use std::fmt;

use co2sight_common::reading::UNKNOWN_READING;
use thiserror::Error;

/// One argument of a bus message, with variants already unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Byte(u8),
    UInt16(u16),
    Int(i64),
    UInt(u64),
    Double(f64),
    Bool(bool),
    Str(String),
    /// Anything without a natural one-word rendering (arrays, dicts, ...).
    Other(String),
}

impl ArgValue {
    fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Byte(_) => "byte",
            ArgValue::UInt16(_) => "uint16",
            ArgValue::Int(_) => "int",
            ArgValue::UInt(_) => "uint",
            ArgValue::Double(_) => "double",
            ArgValue::Bool(_) => "bool",
            ArgValue::Str(_) => "string",
            ArgValue::Other(_) => "other",
        }
    }
}

/// Renders the way the value reads on the console: doubles always keep a
/// fractional part (`24.0`), integers never get one (`415`).
impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Byte(v) => write!(f, "{}", v),
            ArgValue::UInt16(v) => write!(f, "{}", v),
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::UInt(v) => write!(f, "{}", v),
            ArgValue::Double(v) => write!(f, "{:?}", v),
            ArgValue::Bool(v) => write!(f, "{}", v),
            ArgValue::Str(v) | ArgValue::Other(v) => f.write_str(v),
        }
    }
}

/// Why a message's arguments are not a `NewValue` payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected 4 arguments, got {0}")]
    Arity(usize),

    #[error("argument {index} ({field}): expected {expected}, got {actual}")]
    Type {
        index: usize,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Decoded `NewValue` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifiedReading {
    /// Device item code (0x42 temperature, 0x50 CO2, ...).
    pub code: u8,
    /// Undecoded 16-bit word from the device.
    pub raw_value: u16,
    /// Reading name, or `UNKNOWN` for codes the daemon does not recognize.
    pub name: String,
    /// Decoded value, rendered for display.
    pub display_value: String,
}

impl NotifiedReading {
    /// Decode the ordered argument list `(code, raw_value, name, value)`.
    pub fn decode(args: &[ArgValue]) -> Result<Self, DecodeError> {
        let [code, raw_value, name, value] = args else {
            return Err(DecodeError::Arity(args.len()));
        };

        let code = match code {
            ArgValue::Byte(v) => *v,
            other => return Err(type_error(0, "code", "byte", other)),
        };
        let raw_value = match raw_value {
            ArgValue::UInt16(v) => *v,
            other => return Err(type_error(1, "raw_value", "uint16", other)),
        };
        let name = match name {
            ArgValue::Str(v) => v.clone(),
            other => return Err(type_error(2, "name", "string", other)),
        };

        Ok(Self {
            code,
            raw_value,
            name,
            display_value: value.to_string(),
        })
    }

    /// Whether the reading carries a meaningful name.
    pub fn is_reportable(&self) -> bool {
        self.name != UNKNOWN_READING
    }

    /// Console line for this reading, without the newline.
    pub fn line(&self) -> String {
        format!("{} {}", self.name, self.display_value)
    }
}

fn type_error(
    index: usize,
    field: &'static str,
    expected: &'static str,
    actual: &ArgValue,
) -> DecodeError {
    DecodeError::Type {
        index,
        field,
        expected,
        actual: actual.type_name(),
    }
}
