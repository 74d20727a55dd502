//! Base64url segment encoding for the compact serialization

use crate::error::{TokenError, TokenResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// JSON-encode `value` and base64url the bytes
pub(crate) fn encode_segment<T: Serialize + ?Sized>(value: &T) -> TokenResult<String> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::serialization(&e.to_string()))?;
    Ok(base64_url_encode(&json))
}

/// Base64url-decode `segment` and parse the JSON inside; `what` names the
/// segment in error messages
pub(crate) fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> TokenResult<T> {
    let bytes = base64_url_decode(segment)
        .map_err(|e| TokenError::MalformedCompactForm(format!("invalid {what} encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedCompactForm(format!("invalid {what} JSON: {e}")))
}
