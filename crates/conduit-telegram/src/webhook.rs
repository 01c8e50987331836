// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update normalization for inbound Telegram webhooks.

use conduit_core::{WebhookEvent, WebhookEventType};
use conduit_integration::passthrough_event;
use serde_json::Value;

/// Header Telegram sets to the `secret_token` given to `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Maps an `Update` to a `message` or `callback_query` event.
pub fn parse_update(update: Value) -> WebhookEvent {
    let update_id = update.get("update_id").cloned().unwrap_or(Value::Null);

    if let Some(message) = update.get("message").filter(|m| m.is_object()) {
        let from = &message["from"];
        let event = WebhookEvent::new(WebhookEventType::Message, Value::Null)
            .with("update_id", update_id)
            .with("message_id", message["message_id"].clone())
            .with("chat_id", message["chat"]["id"].clone())
            .with("chat_type", message["chat"]["type"].clone())
            .with("from_id", from["id"].clone())
            .with("username", from["username"].clone())
            .with("first_name", from["first_name"].clone())
            .with("text", message["text"].clone())
            .with("date", message["date"].clone());
        return WebhookEvent {
            raw_payload: update,
            ..event
        };
    }

    if let Some(query) = update.get("callback_query").filter(|q| q.is_object()) {
        let event = WebhookEvent::new(WebhookEventType::CallbackQuery, Value::Null)
            .with("update_id", update_id)
            .with("callback_query_id", query["id"].clone())
            .with("from_id", query["from"]["id"].clone())
            .with("username", query["from"]["username"].clone())
            .with("data", query["data"].clone())
            .with("message_id", query["message"]["message_id"].clone())
            .with("chat_id", query["message"]["chat"]["id"].clone());
        return WebhookEvent {
            raw_payload: update,
            ..event
        };
    }

    passthrough_event(update)
}
