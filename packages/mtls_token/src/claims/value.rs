//! Claim values: the JSON shapes a claim can take

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nested claim object, e.g. the body of `cnf`
pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// Value of a single claim.
///
/// Integers are tried before floats when decoding, so `1521644867` lands in
/// [`ClaimValue::Integer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// Integral JSON number
    Integer(i64),
    /// Any other JSON number
    Float(f64),
    /// JSON string
    Text(String),
    /// JSON array
    Sequence(Vec<ClaimValue>),
    /// JSON object
    Map(ClaimMap),
}

impl ClaimValue {
    /// Text content, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer content, if this is an integral number
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Nested object, if this is one
    #[must_use]
    pub fn as_map(&self) -> Option<&ClaimMap> {
        match self {
            ClaimValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable nested object, if this is one
    pub fn as_map_mut(&mut self) -> Option<&mut ClaimMap> {
        match self {
            ClaimValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short shape name for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimValue::Null => "null",
            ClaimValue::Bool(_) => "boolean",
            ClaimValue::Integer(_) => "integer",
            ClaimValue::Float(_) => "number",
            ClaimValue::Text(_) => "string",
            ClaimValue::Sequence(_) => "array",
            ClaimValue::Map(_) => "object",
        }
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Integer(i64::from(value))
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Text(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::Text(value)
    }
}

impl From<ClaimMap> for ClaimValue {
    fn from(value: ClaimMap) -> Self {
        ClaimValue::Map(value)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        ClaimValue::Sequence(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shapes_decode_to_matching_variants() {
        let decoded: ClaimMap = serde_json::from_str(
            r#"{"n":null,"b":true,"i":1521644867,"f":1.5,"s":"x","a":[1,"y"],"o":{"k":"v"}}"#,
        )
        .unwrap();

        assert_eq!(decoded["n"], ClaimValue::Null);
        assert_eq!(decoded["b"], ClaimValue::Bool(true));
        assert_eq!(decoded["i"], ClaimValue::Integer(1_521_644_867));
        assert_eq!(decoded["f"], ClaimValue::Float(1.5));
        assert_eq!(decoded["s"], ClaimValue::from("x"));
        assert_eq!(
            decoded["a"],
            ClaimValue::Sequence(vec![ClaimValue::Integer(1), ClaimValue::from("y")])
        );
        assert_eq!(decoded["o"].as_map().unwrap()["k"], ClaimValue::from("v"));
    }

    #[test]
    fn test_values_encode_verbatim() {
        let value = ClaimValue::from(vec!["a", "b"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["a","b"]"#);
        assert_eq!(serde_json::to_string(&ClaimValue::Null).unwrap(), "null");
    }
}
