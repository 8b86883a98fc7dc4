//! The remote's two-character boolean encoding.
//!
//! Booleans travel as `"y"` / `"n"`. Decoding is deliberately asymmetric:
//! only `"y"` and `"Y"` are true, every other value (including `""`, `"n"`,
//! `"N"` and garbage) is false.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Wire spelling of `true`.
pub const YES: &str = "y";
/// Wire spelling of `false`.
pub const NO: &str = "n";

/// Encodes a boolean for the wire.
pub fn to_wire(value: bool) -> &'static str {
    if value {
        YES
    } else {
        NO
    }
}

/// Decodes a wire boolean. `true` only for exactly `"y"` or `"Y"`.
pub fn from_wire(value: &str) -> bool {
    value == "y" || value == "Y"
}

fn from_wire_value(value: &Value) -> bool {
    value.as_str().is_some_and(from_wire)
}

/// `with` adapter for a boolean column that is always sent.
pub mod required {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(to_wire(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Value::deserialize(deserializer).map(|value| from_wire_value(&value))
    }
}

/// `with` adapter for an optional boolean column.
///
/// Pair with `#[serde(default, skip_serializing_if = "Option::is_none")]`.
/// A missing field or `null` decodes to `None`.
pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(to_wire(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => Ok(Some(from_wire_value(&value))),
        }
    }
}
