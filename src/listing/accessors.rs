//! Total accessors over untyped JSON
//!
//! None of the lookups here fail: a missing key, a `null`, or a lookup on a
//! non-object all yield `Value::Null` or `None`. The two `expect_*` helpers
//! are the only place a shape can be rejected, and they still treat `null`
//! as empty.

use crate::PageProcessingError;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Looks up `key` on an object; anything else yields `null`
pub fn get<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Follows a chain of keys with [`get`]
pub fn get_path<'a>(value: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter().fold(value, |current, key| get(current, key))
}

/// Unsigned integer, or `default` when absent or not a non-negative integer
///
/// Integral floats such as `3.0` count as integers.
pub fn u32_or(value: &Value, default: u32) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(default),
        Value::String(s) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Boolean, or `default` when absent or not a boolean
pub fn bool_or(value: &Value, default: bool) -> bool {
    value.as_bool().unwrap_or(default)
}

/// Accepts an object or `null`; any other type is a shape error
pub fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Value, PageProcessingError> {
    match value {
        Value::Object(_) | Value::Null => Ok(value),
        _ => Err(PageProcessingError::UnexpectedShape {
            path: path.to_string(),
            expected: "object",
        }),
    }
}

/// Accepts an array or `null` (as empty); any other type is a shape error
pub fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], PageProcessingError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Null => Ok(&[]),
        _ => Err(PageProcessingError::UnexpectedShape {
            path: path.to_string(),
            expected: "array",
        }),
    }
}

/// Array items, with anything that is not an array treated as empty
pub fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_is_total() {
        let value = json!({"a": {"b": 1}, "n": null});

        assert_eq!(get(&value, "a"), &json!({"b": 1}));
        assert_eq!(get(&value, "missing"), &Value::Null);
        assert_eq!(get(&value, "n"), &Value::Null);
        assert_eq!(get(&json!("string"), "a"), &Value::Null);
        assert_eq!(get(&json!([1, 2]), "a"), &Value::Null);
    }

    #[test]
    fn test_get_path() {
        let value = json!({"data": {"search": {"announcements": {"data": []}}}});

        assert_eq!(
            get_path(&value, &["data", "search", "announcements", "data"]),
            &json!([])
        );
        assert_eq!(get_path(&value, &["data", "nope", "deeper"]), &Value::Null);
    }

    #[test]
    fn test_u32_and_bool_defaults() {
        assert_eq!(u32_or(&json!(7), 1), 7);
        assert_eq!(u32_or(&json!("4"), 1), 4);
        assert_eq!(u32_or(&Value::Null, 1), 1);
        assert_eq!(u32_or(&json!(-3), 1), 1);
        assert_eq!(u32_or(&json!(3.0), 1), 3);
        assert_eq!(u32_or(&json!(2.5), 1), 1);
        assert_eq!(u32_or(&json!(-2.0), 1), 1);

        assert!(bool_or(&json!(true), false));
        assert!(!bool_or(&Value::Null, false));
        assert!(!bool_or(&json!("true"), false));
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(&json!({}), "data").is_ok());
        assert!(expect_object(&Value::Null, "data").is_ok());

        let err = expect_object(&json!(3), "data.search").unwrap_err();
        assert!(err.to_string().contains("data.search"));
    }

    #[test]
    fn test_expect_array() {
        assert_eq!(expect_array(&json!([1, 2]), "x").unwrap().len(), 2);
        assert!(expect_array(&Value::Null, "x").unwrap().is_empty());
        assert!(expect_array(&json!({}), "x").is_err());
    }

    #[test]
    fn test_items() {
        assert_eq!(items(&json!([1])).len(), 1);
        assert!(items(&Value::Null).is_empty());
        assert!(items(&json!("no")).is_empty());
    }
}
