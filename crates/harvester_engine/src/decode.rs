use serde_json::Value;

use crate::{FailureKind, FetchError, Record};

/// Keys that may carry the record array, in lookup order.
pub const RECORD_KEYS: [&str; 2] = ["aaData", "data"];

/// Parse a list-endpoint response body into its records.
pub fn decode_records(body: &[u8]) -> Result<Vec<Record>, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    records_from_response(value)
}

/// Unwrap the record array using [`RECORD_KEYS`]: the first key that is present and
/// not null wins; no such key, or a body that is not an object, yields no records.
pub fn records_from_response(value: Value) -> Result<Vec<Record>, FetchError> {
    first_array(value, &RECORD_KEYS)
}

fn first_array(value: Value, keys: &[&str]) -> Result<Vec<Record>, FetchError> {
    let Value::Object(mut fields) = value else {
        return Ok(Vec::new());
    };

    for key in keys {
        match fields.remove(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(records)) => return Ok(records),
            Some(other) => {
                return Err(FetchError::new(
                    FailureKind::Decode,
                    format!("`{key}` is not an array (found {})", kind_of(&other)),
                ));
            }
        }
    }
    Ok(Vec::new())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
