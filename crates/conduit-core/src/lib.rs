// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Conduit provider integrations.
//!
//! This crate provides the error taxonomy, response envelope, normalized
//! webhook event, and credential types used by the request engine and every
//! provider adapter.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ConduitError, ErrorKind, RateLimitSource};
pub use types::{
    ConnectionTest, CredentialBag, DEFAULT_WINDOW_MS, Envelope, Provider, WebhookEvent,
    WebhookEventType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn provider_display_round_trips() {
        for provider in Provider::iter() {
            let s = provider.to_string();
            let parsed = Provider::from_str(&s).expect("should parse back");
            assert_eq!(provider, parsed);
        }
        assert_eq!(Provider::WhatsApp.to_string(), "whatsapp");
    }

    #[test]
    fn provider_rate_limit_defaults() {
        assert_eq!(Provider::Msg91.default_max_requests(), 150);
        assert_eq!(Provider::WhatsApp.default_max_requests(), 80);
        assert_eq!(Provider::Telegram.default_max_requests(), 100);
        assert_eq!(Provider::Shiprocket.default_max_requests(), 100);
        assert_eq!(Provider::Cashfree.default_max_requests(), 100);
        assert_eq!(DEFAULT_WINDOW_MS, 60_000);
    }

    #[test]
    fn success_envelope_shape() {
        let env = Envelope::success(serde_json::json!({"id": 7}));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 7);
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn failure_envelope_shape() {
        let err = ConduitError::missing_fields(["email"]);
        let env: Envelope<serde_json::Value> = Envelope::from_result(Err(err));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "missing required fields: email");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn webhook_event_flattens_fields() {
        let raw = serde_json::json!({"requestId": "abc"});
        let event = WebhookEvent::new(WebhookEventType::DeliveryReport, raw.clone())
            .with("request_id", "abc")
            .with("status", "delivered");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "delivery_report");
        assert_eq!(json["request_id"], "abc");
        assert_eq!(json["raw_payload"], raw);
        assert_eq!(event.str_field("status"), Some("delivered"));
    }

    #[test]
    fn credential_bag_debug_hides_values() {
        let bag: CredentialBag = [("auth_key", "super-secret")].into_iter().collect();
        let debug = format!("{bag:?}");
        assert!(debug.contains("auth_key"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn credential_bag_into_typed() {
        #[derive(Debug, Deserialize)]
        struct Creds {
            email: String,
            #[serde(default)]
            token: Option<String>,
        }

        let bag: CredentialBag = [("email", "ops@example.com")].into_iter().collect();
        let creds: Creds = bag.deserialize_into().unwrap();
        assert_eq!(creds.email, "ops@example.com");
        assert!(creds.token.is_none());

        let empty = CredentialBag::new();
        let err = empty.deserialize_into::<Creds>().unwrap_err();
        assert!(matches!(err, ConduitError::Config(_)));
    }

    #[test]
    fn connection_test_failure_keeps_message() {
        let err = ConduitError::Unauthorized {
            status: 401,
            body: "bad key".into(),
        };
        let result = ConnectionTest::failed(Provider::Msg91, &err);
        assert!(!result.success);
        assert!(result.message.contains("authentication failed"));
    }

    proptest! {
        #[test]
        fn validation_message_names_each_field(fields in proptest::collection::vec("[a-z_]{1,12}", 1..6)) {
            let err = ConduitError::missing_fields(fields.clone());
            let msg = err.to_string();
            for f in &fields {
                prop_assert!(msg.contains(f.as_str()));
            }
        }
    }
}
