//! JSON envelope decoding
//!
//! Every JSON response from the server is wrapped in the same envelope: an
//! object with an integer `code` field, `0` on success, anything else a
//! failure described by the `error` string field. The operation payload sits
//! next to `code` under an operation-specific key.

use log::warn;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Media, MediaStatus, MediaStatusKind};

/// Parse a response body and check its envelope.
///
/// Returns the whole envelope object on success so callers can pull their
/// payload field out of it. Fails with `Decode` on malformed JSON and with
/// `Server` when the envelope reports a non-zero code.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(Error::Decode("response is not a JSON object".to_string()));
    }
    let code = value
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Decode("envelope has no integer 'code' field".to_string()))?;
    if code != 0 {
        let message = match value.get("error").and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => format!("server returned code {}", code),
        };
        return Err(Error::Server(message));
    }
    Ok(value)
}

/// Extract an array of strings under `key` from a decoded envelope.
///
/// An element of any other type aborts the extraction; partial lists are
/// never returned.
pub fn string_array(envelope: &Value, key: &str) -> Result<Vec<String>> {
    let array = envelope
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Decode(format!("'{}' is not an array", key)))?;
    let mut out = Vec::with_capacity(array.len());
    for element in array {
        match element.as_str() {
            Some(s) => out.push(s.to_string()),
            None => {
                warn!("element of '{}' is not a string", key);
                return Err(Error::Decode(format!(
                    "element of '{}' is not a string",
                    key
                )));
            }
        }
    }
    Ok(out)
}

/// Extract an array of media objects under `key` from a decoded envelope.
pub fn media_array(envelope: &Value, key: &str) -> Result<Vec<Media>> {
    let array = envelope
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Decode(format!("'{}' is not an array", key)))?;
    let mut out = Vec::with_capacity(array.len());
    for element in array {
        if !element.is_object() {
            warn!("element of '{}' is not an object", key);
            return Err(Error::Decode(format!(
                "element of '{}' is not an object",
                key
            )));
        }
        let media: Media = serde_json::from_value(element.clone())
            .map_err(|e| Error::Decode(format!("bad media in '{}': {}", key, e)))?;
        out.push(media);
    }
    Ok(out)
}

/// Extract the `status` object of a getmediastatus envelope.
///
/// `progress` is clamped into 0..=100 rather than rejected; the server has
/// been seen reporting values past the end of the range while a download
/// finishes.
pub fn media_status(envelope: &Value) -> Result<MediaStatus> {
    let status = envelope
        .get("status")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::Decode("'status' is not an object".to_string()))?;
    let code = status
        .get("status")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Decode("'status.status' is not an integer".to_string()))?;
    let message = status
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Decode("'status.message' is not a string".to_string()))?;
    let progress = status
        .get("progress")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Decode("'status.progress' is not an integer".to_string()))?;
    Ok(MediaStatus {
        status: MediaStatusKind::from_code(code),
        message: message.to_string(),
        progress: progress.clamp(0, 100) as i32,
    })
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
