// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracking-update normalization.

use conduit_core::{WebhookEvent, WebhookEventType};
use conduit_integration::passthrough_event;
use serde_json::Value;

/// Header carrying the token configured on the Shiprocket webhook page.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Maps a tracking push to a `shipment_update` event.
///
/// Payloads without an AWB or a current status are passed through as
/// `unknown`.
pub fn parse_tracking_update(payload: Value) -> WebhookEvent {
    let has_tracking = !payload["awb"].is_null() || !payload["current_status"].is_null();
    if !has_tracking {
        return passthrough_event(payload);
    }

    let shipment_id = first_present(&payload, &["shipment_id", "sr_order_id"]);
    let event = WebhookEvent::new(WebhookEventType::ShipmentUpdate, Value::Null)
        .with("awb", payload["awb"].clone())
        .with("order_id", payload["order_id"].clone())
        .with("shipment_id", shipment_id)
        .with("current_status", payload["current_status"].clone())
        .with("current_status_id", payload["current_status_id"].clone())
        .with("courier_name", payload["courier_name"].clone())
        .with("etd", payload["etd"].clone());
    WebhookEvent {
        raw_payload: payload,
        ..event
    }
}

fn first_present(payload: &Value, keys: &[&str]) -> Value {
    keys.iter()
        .map(|k| &payload[*k])
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}
