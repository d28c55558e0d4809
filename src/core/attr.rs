//! Attribute values of a level object line
//!
//! An object line is a space-separated sequence of heterogeneous tokens:
//! the tag, then integers, floats and bare words in a kind-specific order.
//! `Attr` keeps each token as a tagged variant so that it is written back in
//! exactly the literal form the game expects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{LevelError, Result};

/// Largest magnitude that is still written as an integer when a float value
/// turns out to be integral.
const INTEGRAL_LIMIT: f64 = 1e15;

/// A numeric header or attribute value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Build a number from a computed value, collapsing integral values to `Int`
    ///
    /// Factories compute things like `seconds * 60`; a whole result is written
    /// without a decimal point, a fractional one keeps full precision.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGRAL_LIMIT {
            Number::Int(value as i64)
        } else {
            Number::Float(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write_float(f, v),
        }
    }
}

impl FromStr for Number {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Number::Int(v));
        }
        s.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| LevelError::ParseError(format!("Invalid number: {}", s)))
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v as i64)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

/// Floats always carry a decimal point (`1.0`, `-0.0`, `0.3`)
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        write!(f, "nan")
    } else if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

/// A number read from a file whose canonical form differs from its text
/// (`100.50`, `1e2`, `-0`, `.5`). It is written back as read.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    value: f64,
    text: String,
}

impl Lexeme {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Serialize for Lexeme {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Lexeme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let value = text
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {}", text)))?;
        Ok(Lexeme { value, text })
    }
}

/// A single token of an object's attribute line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attr {
    Int(i64),
    Float(f64),
    Text(String),
    Verbatim(Lexeme),
}

impl Attr {
    /// Numeric attribute from a computed value (see [`Number::from_f64`])
    pub fn num(value: f64) -> Self {
        Number::from_f64(value).into()
    }

    pub fn text(s: impl Into<String>) -> Self {
        Attr::Text(s.into())
    }

    /// Classify one whitespace-free token read from a level file
    pub fn from_token(token: &str) -> Self {
        let looks_numeric = token
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '-' || c == '.')
            .unwrap_or(false);

        if looks_numeric {
            let parsed = match token.parse::<i64>() {
                Ok(v) => Some((Attr::Int(v), v as f64)),
                Err(_) => token.parse::<f64>().ok().map(|v| (Attr::Float(v), v)),
            };
            if let Some((attr, value)) = parsed {
                if attr.to_string() == token {
                    return attr;
                }
                return Attr::Verbatim(Lexeme {
                    value,
                    text: token.to_string(),
                });
            }
        }
        Attr::Text(token.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Attr::Int(v) => Some(v as f64),
            Attr::Float(v) => Some(v),
            Attr::Verbatim(ref lexeme) => Some(lexeme.value),
            Attr::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attr::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Attr::Text(_))
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Int(v) => write!(f, "{}", v),
            Attr::Float(v) => write_float(f, *v),
            Attr::Text(s) => f.write_str(s),
            Attr::Verbatim(lexeme) => f.write_str(&lexeme.text),
        }
    }
}

impl From<Number> for Attr {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(v) => Attr::Int(v),
            Number::Float(v) => Attr::Float(v),
        }
    }
}

impl From<i64> for Attr {
    fn from(v: i64) -> Self {
        Attr::Int(v)
    }
}

impl From<i32> for Attr {
    fn from(v: i32) -> Self {
        Attr::Int(v as i64)
    }
}

impl From<f64> for Attr {
    fn from(v: f64) -> Self {
        Attr::Float(v)
    }
}

impl From<&str> for Attr {
    fn from(s: &str) -> Self {
        Attr::Text(s.to_string())
    }
}

impl From<String> for Attr {
    fn from(s: String) -> Self {
        Attr::Text(s)
    }
}
