// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment webhook normalization and signatures.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use conduit_core::{ConduitError, WebhookEvent, WebhookEventType};
use conduit_integration::{hmac_sha256, passthrough_event};
use serde_json::Value;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

/// Renders an amount the way it appears on the wire: whole amounts carry
/// no fractional part (`100`, not `100.0`).
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// The string Cashfree signs: `order_id + order_amount + timestamp`.
pub fn signed_payload(order_id: &str, order_amount: f64, timestamp: &str) -> String {
    format!("{order_id}{}{timestamp}", format_amount(order_amount))
}

/// `base64(HMAC-SHA256(secret, order_id + order_amount + timestamp))`.
pub fn compute_signature(
    order_id: &str,
    order_amount: f64,
    timestamp: &str,
    secret: &str,
) -> Result<String, ConduitError> {
    let payload = signed_payload(order_id, order_amount, timestamp);
    let mac = hmac_sha256(secret.as_bytes(), payload.as_bytes())?;
    Ok(STANDARD.encode(mac))
}

fn event_type(kind: &str) -> WebhookEventType {
    match kind {
        "PAYMENT_SUCCESS_WEBHOOK" => WebhookEventType::PaymentSuccess,
        "PAYMENT_FAILED_WEBHOOK" => WebhookEventType::PaymentFailed,
        "PAYMENT_USER_DROPPED_WEBHOOK" => WebhookEventType::PaymentUserDropped,
        "REFUND_STATUS_WEBHOOK" => WebhookEventType::RefundStatus,
        _ => WebhookEventType::Unknown,
    }
}

pub fn parse_payment_webhook(payload: Value) -> WebhookEvent {
    let kind = payload["type"].as_str().map(event_type);
    let Some(kind) = kind.filter(|k| *k != WebhookEventType::Unknown) else {
        return passthrough_event(payload);
    };

    let data = &payload["data"];
    let order_id = [&data["order"]["order_id"], &data["refund"]["order_id"]]
        .into_iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null);
    let mut event = WebhookEvent::new(kind, Value::Null)
        .with("order_id", order_id)
        .with("order_amount", data["order"]["order_amount"].clone())
        .with("payment_status", data["payment"]["payment_status"].clone())
        .with("cf_payment_id", data["payment"]["cf_payment_id"].clone())
        .with("payment_amount", data["payment"]["payment_amount"].clone())
        .with("event_time", payload["event_time"].clone());
    if kind == WebhookEventType::RefundStatus {
        event = event
            .with("refund_id", data["refund"]["refund_id"].clone())
            .with("refund_status", data["refund"]["refund_status"].clone())
            .with("refund_amount", data["refund"]["refund_amount"].clone());
    }
    WebhookEvent {
        raw_payload: payload,
        ..event
    }
}
