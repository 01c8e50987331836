// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud API webhook normalization.
//!
//! Meta wraps every notification as `entry[].changes[].value`. Only the
//! first entry and change are inspected.

use conduit_core::{WebhookEvent, WebhookEventType};
use conduit_integration::passthrough_event;
use serde_json::Value;

/// Header carrying `sha256=<hex hmac>` of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

pub fn parse_notification(payload: Value) -> WebhookEvent {
    let value = &payload["entry"][0]["changes"][0]["value"];

    if let Some(message) = value["messages"].as_array().and_then(|m| m.first()) {
        let event = WebhookEvent::new(WebhookEventType::MessageReceived, Value::Null)
            .with("message_id", message["id"].clone())
            .with("from", message["from"].clone())
            .with("timestamp", message["timestamp"].clone())
            .with("message_type", message["type"].clone())
            .with("text", message_text(message))
            .with("contact_name", value["contacts"][0]["profile"]["name"].clone())
            .with("phone_number_id", value["metadata"]["phone_number_id"].clone());
        let event = match reply_id(message) {
            Some(id) => event.with("reply_id", id),
            None => event,
        };
        return WebhookEvent {
            raw_payload: payload,
            ..event
        };
    }

    if let Some(status) = value["statuses"].as_array().and_then(|s| s.first()) {
        let event = WebhookEvent::new(WebhookEventType::MessageStatus, Value::Null)
            .with("message_id", status["id"].clone())
            .with("status", status["status"].clone())
            .with("recipient_id", status["recipient_id"].clone())
            .with("timestamp", status["timestamp"].clone())
            .with("errors", status["errors"].clone());
        return WebhookEvent {
            raw_payload: payload,
            ..event
        };
    }

    passthrough_event(payload)
}

/// Text body, or the title of the tapped button/list row.
fn message_text(message: &Value) -> Value {
    let candidates = [
        &message["text"]["body"],
        &message["interactive"]["button_reply"]["title"],
        &message["interactive"]["list_reply"]["title"],
        &message["button"]["text"],
    ];
    candidates
        .into_iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

fn reply_id(message: &Value) -> Option<Value> {
    [
        &message["interactive"]["button_reply"]["id"],
        &message["interactive"]["list_reply"]["id"],
    ]
    .into_iter()
    .find(|v| !v.is_null())
    .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(value: Value) -> Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{"id": "WABA", "changes": [{"field": "messages", "value": value}]}]
        })
    }

    #[test]
    fn inbound_text_message() {
        let payload = wrap(json!({
            "messaging_product": "whatsapp",
            "metadata": {"display_phone_number": "15550001111", "phone_number_id": "PNID"},
            "contacts": [{"profile": {"name": "Ravi"}, "wa_id": "919876543210"}],
            "messages": [{
                "from": "919876543210",
                "id": "wamid.1",
                "timestamp": "1700000000",
                "type": "text",
                "text": {"body": "Where is my order?"}
            }]
        }));
        let event = parse_notification(payload.clone());
        assert_eq!(event.event_type, WebhookEventType::MessageReceived);
        assert_eq!(event.str_field("message_id"), Some("wamid.1"));
        assert_eq!(event.str_field("text"), Some("Where is my order?"));
        assert_eq!(event.str_field("contact_name"), Some("Ravi"));
        assert_eq!(event.str_field("phone_number_id"), Some("PNID"));
        assert_eq!(event.raw_payload, payload);
    }

    #[test]
    fn button_reply_carries_id_and_title() {
        let payload = wrap(json!({
            "messages": [{
                "from": "919876543210",
                "id": "wamid.2",
                "type": "interactive",
                "interactive": {"type": "button_reply", "button_reply": {"id": "yes", "title": "Yes"}}
            }]
        }));
        let event = parse_notification(payload);
        assert_eq!(event.str_field("text"), Some("Yes"));
        assert_eq!(event.str_field("reply_id"), Some("yes"));
    }

    #[test]
    fn status_update() {
        let payload = wrap(json!({
            "statuses": [{
                "id": "wamid.3",
                "status": "failed",
                "recipient_id": "919876543210",
                "timestamp": "1700000001",
                "errors": [{"code": 131026, "title": "Message undeliverable"}]
            }]
        }));
        let event = parse_notification(payload);
        assert_eq!(event.event_type, WebhookEventType::MessageStatus);
        assert_eq!(event.str_field("status"), Some("failed"));
        assert_eq!(event.field("errors").unwrap()[0]["code"], 131026);
    }

    #[test]
    fn neither_shape_is_unknown() {
        let event = parse_notification(wrap(json!({"messaging_product": "whatsapp"})));
        assert_eq!(event.event_type, WebhookEventType::Unknown);

        let event = parse_notification(json!({"hello": "world"}));
        assert_eq!(event.event_type, WebhookEventType::Unknown);
    }
}
