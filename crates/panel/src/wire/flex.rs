//! Flexible scalar decoding.
//!
//! The remote API emits numeric columns either as JSON numbers or as JSON
//! strings depending on the call and the field, and uses `""` for "no value".
//! [`decode_flex_int`] accepts all three; the serde adapters in this module
//! route every numeric record field through it.
//!
//! ```
//! use panel::wire::flex::decode_flex_int;
//! use serde_json::json;
//!
//! assert_eq!(decode_flex_int(&json!(7)).unwrap(), 7);
//! assert_eq!(decode_flex_int(&json!("7")).unwrap(), 7);
//! assert_eq!(decode_flex_int(&json!("")).unwrap(), 0);
//! assert!(decode_flex_int(&json!(null)).is_err());
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::identifiers::Identifier;

/// The value was neither a number, a numeric string nor `""`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an integer or numeric string, got {found}")]
pub struct FlexIntError {
    found: String,
}

impl FlexIntError {
    fn new(value: &Value) -> Self {
        Self {
            found: value.to_string(),
        }
    }
}

/// Decodes a JSON value into an integer.
///
/// - native number: taken as is; fractional values are truncated toward zero
/// - numeric string: parsed after trimming surrounding whitespace
/// - empty string: `0`
/// - anything else: [`FlexIntError`]
pub fn decode_flex_int(value: &Value) -> Result<i64, FlexIntError> {
    match value {
        Value::Number(number) => {
            if let Some(i) = number.as_i64() {
                return Ok(i);
            }
            if number.is_u64() {
                // Only reachable for values above i64::MAX.
                return Err(FlexIntError::new(value));
            }
            match number.as_f64() {
                Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(f.trunc() as i64)
                }
                _ => Err(FlexIntError::new(value)),
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse().map_err(|_| FlexIntError::new(value))
        }
        _ => Err(FlexIntError::new(value)),
    }
}

// ---------------------------------------------------------------------------
// serde adapters
// ---------------------------------------------------------------------------

/// `deserialize_with` adapter for a required integer field.
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    decode_flex_int(&value).map_err(D::Error::custom)
}

/// `deserialize_with` adapter for an optional integer field.
///
/// Combine with `#[serde(default)]` so a missing field becomes `None`. A JSON
/// `null` also decodes to `None`.
pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => decode_flex_int(&value).map(Some).map_err(D::Error::custom),
    }
}

/// `deserialize_with` adapter for an optional reference to another record.
///
/// Missing, `null`, `""` and `0` all mean "no reference" and decode to `None`.
pub fn opt_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Identifier,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        value => decode_flex_int(&value).map_err(D::Error::custom)?,
    };
    match u64::try_from(raw) {
        Ok(0) => Ok(None),
        Ok(id) => Ok(Some(T::from(id))),
        Err(_) => Err(D::Error::custom(format!("negative identifier: {raw}"))),
    }
}

/// `serialize_with` adapter for integer columns the remote only accepts as
/// numeric strings (it rejects both `""` and bare numbers for these).
pub fn int_as_string<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn truncates_fractional_numbers() {
        assert_eq!(decode_flex_int(&json!(3.9)).unwrap(), 3);
        assert_eq!(decode_flex_int(&json!(-3.9)).unwrap(), -3);
    }

    #[test]
    fn trims_whitespace_in_strings() {
        assert_eq!(decode_flex_int(&json!(" 12 ")).unwrap(), 12);
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [json!(null), json!(true), json!([1]), json!({"id": 1}), json!("abc")] {
            let err = decode_flex_int(&value).unwrap_err();
            assert!(err.to_string().contains("expected an integer"), "{value}");
        }
    }

    #[test]
    fn rejects_numbers_beyond_i64() {
        assert!(decode_flex_int(&json!(u64::MAX)).is_err());
    }

    proptest! {
        #[test]
        fn number_and_numeric_string_agree(n in 0i64..=i64::MAX) {
            let from_number = decode_flex_int(&json!(n)).unwrap();
            let from_string = decode_flex_int(&json!(n.to_string())).unwrap();
            prop_assert_eq!(from_number, n);
            prop_assert_eq!(from_string, n);
        }
    }
}
