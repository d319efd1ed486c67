use std::collections::BTreeMap;
use std::iter::FromIterator;

use hiv_core::errors::{ErrorInfo, HivError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn serde_error(code: &str, err: impl ToString) -> HivError {
    HivError::Io(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into pretty-printed JSON with object keys sorted.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, HivError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json.serialize", err))?;
    let mut bytes = serde_json::to_vec_pretty(&canonicalize(value))
        .map_err(|err| serde_error("json.write", err))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, HivError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json.parse", err))
}

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
