//! Resource stores backed by [`crate::storage::DocumentStore`].

pub mod profiles;
pub mod scenarios;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number for a metadata field; anything else is malformed.
pub(crate) fn string_like<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string, found {other}"))),
    }
}

pub(crate) fn opt_string_like<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("expected string, found {other}"))),
    }
}
