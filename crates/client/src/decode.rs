//! Response decoding.

use log::warn;
use serde_json::Value;

use crate::error::ApiError;

/// Bodies are truncated to this many characters in logs.
const LOG_BODY_CHARS: usize = 200;

/// Parse a response body into a JSON value tree.
///
/// The tree is returned as-is; no schema is imposed. A body that is not
/// JSON, or that is the literal `null`, fails with
/// [`ApiError::ResponseParse`] carrying the raw body.
pub fn decode_response(body: &[u8]) -> Result<Value, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Err(parse_error(body, "response body is JSON null".to_string())),
        Ok(value) => Ok(value),
        Err(e) => Err(parse_error(body, e.to_string())),
    }
}

fn parse_error(body: &[u8], reason: String) -> ApiError {
    let body = String::from_utf8_lossy(body).into_owned();
    let preview: String = body.chars().take(LOG_BODY_CHARS).collect();
    warn!("failed to decode API response ({}): {}", reason, preview);
    ApiError::ResponseParse { body, reason }
}
