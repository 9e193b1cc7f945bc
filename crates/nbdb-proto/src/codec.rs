//! Structured-text encoding of a flat field set.
//!
//! A record is encoded as a single JSON object mapping field names to values.
//! Only the top level is interpreted here; nested lists and dictionaries are
//! carried through as [`Value`]s.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::value::Value;

/// Encode name/value pairs as a JSON object.
///
/// Non-finite floats are rejected since JSON would silently turn them into
/// `null`.
pub fn encode_object<'a, K, I>(fields: I) -> Result<String, Error>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, &'a Value)>,
{
    let mut object = BTreeMap::new();
    for (name, value) in fields {
        let name = name.as_ref().to_string();
        if value.has_non_finite() {
            return Err(Error::Encode(format!(
                "field {name} holds a non-finite float"
            )));
        }
        object.insert(name, value);
    }

    serde_json::to_string(&object).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode a JSON object into name/value pairs, ordered by name.
///
/// Explicit `null` members are kept as [`Value::Null`] so callers can tell
/// "present but null" apart from "missing".
pub fn decode_object(text: &str) -> Result<Vec<(String, Value)>, Error> {
    let object: BTreeMap<String, Value> = serde_json::from_str(text).map_err(Error::decode)?;
    Ok(object.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_a_plain_object() {
        let id = Value::from("lp1");
        let enabled = Value::from(true);
        let text = encode_object([("id", &id), ("enabled", &enabled)]).unwrap();

        assert_eq!(text, r#"{"enabled":true,"id":"lp1"}"#);
    }

    #[test]
    fn test_decode_keeps_explicit_null() {
        let fields = decode_object(r#"{"id": "lp1", "mac": null}"#).unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], ("id".to_string(), Value::from("lp1")));
        assert_eq!(fields[1], ("mac".to_string(), Value::Null));
    }

    #[test]
    fn test_decode_rejects_malformed_text() {
        assert!(matches!(decode_object("{\"id\": "), Err(Error::Decode(_))));
        assert!(matches!(decode_object("[1, 2]"), Err(Error::Decode(_))));
        assert!(matches!(decode_object("\"id\""), Err(Error::Decode(_))));
    }

    #[test]
    fn test_encode_rejects_non_finite() {
        let nan = Value::Float(f64::NAN);
        assert!(matches!(
            encode_object([("weight", &nan)]),
            Err(Error::Encode(_))
        ));
    }
}
