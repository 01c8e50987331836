// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook plumbing: body decoding and signature primitives.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use conduit_core::{ConduitError, WebhookEvent, WebhookEventType};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// A webhook body as received: raw bytes or an already-decoded value.
#[derive(Debug, Clone)]
pub enum WebhookBody<'a> {
    Raw(&'a [u8]),
    Json(Value),
}

impl WebhookBody<'_> {
    /// Decodes the body. Raw bodies that are not JSON are rejected.
    pub fn into_json(self) -> Result<Value, ConduitError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Raw(bytes) => {
                serde_json::from_slice(bytes).map_err(|e| ConduitError::InvalidWebhookPayload {
                    message: e.to_string(),
                })
            }
        }
    }
}

impl<'a> From<&'a str> for WebhookBody<'a> {
    fn from(s: &'a str) -> Self {
        Self::Raw(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for WebhookBody<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Raw(bytes)
    }
}

impl From<Value> for WebhookBody<'_> {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Wraps a payload no adapter recognized, copying its top-level fields.
pub fn passthrough_event(payload: Value) -> WebhookEvent {
    let mut event = WebhookEvent::new(WebhookEventType::Unknown, Value::Null);
    if let Value::Object(map) = &payload {
        event.fields = map.clone();
    }
    event.raw_payload = payload;
    event
}

/// Raw HMAC-SHA256 of `payload` under `secret`.
pub fn hmac_sha256(secret: &[u8], payload: &[u8]) -> Result<Vec<u8>, ConduitError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ConduitError::Config(format!("invalid HMAC key: {e}")))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verifies a hex-encoded HMAC-SHA256 in constant time.
///
/// Malformed hex is a mismatch, not an error.
pub fn verify_hmac_sha256_hex(secret: &[u8], payload: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Verifies a base64-encoded HMAC-SHA256 in constant time.
pub fn verify_hmac_sha256_base64(secret: &[u8], payload: &[u8], signature_b64: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature_b64.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Compares two strings without short-circuiting on the first difference.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reads a header as a string, ignoring non-UTF-8 values.
pub fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
