//! Server response envelope
//!
//! Every response body has the shape
//! `{ "success": bool, "data": T, "message"?: string }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed wrapper around every server payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Wire form tolerant of a missing `data` field (error responses omit it).
#[derive(Deserialize)]
struct WireEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope<Value> {
    /// Decode a response body.
    ///
    /// An empty body (204/205) decodes as a successful envelope with `null`
    /// data so unit-typed callers still succeed.
    ///
    /// # Errors
    /// Returns the JSON error when the body is not an envelope.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self { success: true, data: Value::Null, message: None });
        }

        let wire: WireEnvelope = serde_json::from_slice(body)?;
        Ok(Self { success: wire.success, data: wire.data, message: wire.message })
    }

    /// Convert the untyped payload into `T`.
    ///
    /// # Errors
    /// Returns the JSON error when `data` does not match `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
        let data = serde_json::from_value(self.data)?;
        Ok(Envelope { success: self.success, data, message: self.message })
    }
}

/// Extract the server-provided `message` from an error body, if any.
///
/// Lenient on purpose: a body that is not a full envelope can still carry a
/// message worth showing.
pub fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(ToString::to_string)
}
