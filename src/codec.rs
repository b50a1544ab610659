//! Wire-string encoding for structured values.
//!
//! Attribute lists, scope lists, and attribute-id lists all travel to the
//! engine as a single flattened string. [`Value`] is the structured form a
//! caller hands to the handle operations; [`Value::encode`] produces the wire
//! representation:
//!
//! - a scalar passes through unchanged,
//! - an ordered list joins its elements with `,` in original order,
//! - ordered key/value pairs render as `(key=value)` tokens joined with `,`.
//!
//! No escaping of embedded separators happens at this layer; values that
//! contain `,` are the caller's responsibility, consistent with the wire
//! format. Character-level escaping of reserved characters is the engine's
//! job and is reached through [`escape`] and [`unescape`].

use crate::{
    engine::Engine,
    error::ProtocolError,
};

/// A structured value to be flattened into a wire string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A plain string, passed through unchanged.
    Str(String),
    /// An ordered list, joined with `,`.
    List(Vec<String>),
    /// Ordered key/value pairs, rendered as `(key=value)` tokens.
    Map(Vec<(String, String)>),
}

impl Value {
    /// Flattens the value into the string representation the engine expects.
    pub fn encode(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::List(items) => items.join(","),
            Value::Map(pairs) => pairs
                .iter()
                .map(|(key, val)| format!("({key}={val})"))
                .collect::<Vec<String>>()
                .join(","),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Str(String::new())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

impl From<&[&str]> for Value {
    fn from(value: &[&str]) -> Self {
        Value::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(value: [&str; N]) -> Self {
        Value::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(value: Vec<(String, String)>) -> Self {
        Value::Map(value)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Value {
    fn from(value: [(&str, &str); N]) -> Self {
        Value::Map(
            value
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Escapes reserved characters in `text`.
///
/// Which characters are reserved depends on whether the text is an attribute
/// tag or a value; the rules themselves live in the engine.
pub fn escape<E: Engine>(engine: &E, text: &str, is_tag: bool) -> Result<String, ProtocolError> {
    engine
        .escape(text, is_tag)
        .map_err(|code| ProtocolError::new(code, "escape"))
}

/// Reverses [`escape`].
pub fn unescape<E: Engine>(engine: &E, text: &str, is_tag: bool) -> Result<String, ProtocolError> {
    engine
        .unescape(text, is_tag)
        .map_err(|code| ProtocolError::new(code, "unescape"))
}
