// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API adapter for Conduit.
//!
//! The bot token lives in the URL path (`/bot<token>/<method>`), so this
//! adapter only customizes endpoint building; every call still goes through
//! the shared pipeline. Responses are unwrapped from the `{ok, result}`
//! envelope Telegram uses.

pub mod keyboard;
pub mod types;
pub mod webhook;

use async_trait::async_trait;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Envelope, Provider, WebhookEvent};
use conduit_integration::{
    ApiRequest, Integration, IntegrationClient, WebhookBody, constant_time_compare, header_str,
    validate_required_fields,
};
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

pub use keyboard::{InlineButton, KeyboardButton, inline_keyboard, remove_keyboard, reply_keyboard};
pub use types::{
    AnswerCallbackQuery, DeleteMessage, EditMessageText, SendDocument, SendMessage, SendPhoto,
    SetWebhook, TelegramCredentials,
};
pub use webhook::SECRET_TOKEN_HEADER;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram adapter. One instance per bot token.
#[derive(Debug)]
pub struct TelegramIntegration {
    client: IntegrationClient,
    credentials: Option<TelegramCredentials>,
}

impl TelegramIntegration {
    pub fn new() -> Result<Self, ConduitError> {
        let client = IntegrationClient::builder(Provider::Telegram, DEFAULT_BASE_URL).build()?;
        Ok(Self {
            client,
            credentials: None,
        })
    }

    /// Builds the adapter from `[providers.telegram]`. A section-level
    /// `webhook_secret` fills in a missing credential one.
    pub fn from_config(config: &ConduitConfig) -> Result<Self, ConduitError> {
        let section = config.providers.get(Provider::Telegram);
        let client = IntegrationClient::builder(Provider::Telegram, DEFAULT_BASE_URL)
            .apply_config(section, &config.http)
            .build()?;
        let mut integration = Self {
            client,
            credentials: None,
        };
        if let Some(section) = section
            && !section.credentials.is_empty()
        {
            let mut credentials: TelegramCredentials = section.credentials.deserialize_into()?;
            if credentials.webhook_secret.is_none() {
                credentials.webhook_secret = section.webhook_secret.clone();
            }
            integration.initialize(credentials);
        }
        Ok(integration)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client.set_base_url(url);
        self
    }

    fn credentials(&self) -> Result<&TelegramCredentials, ConduitError> {
        self.credentials.as_ref().ok_or(ConduitError::NotInitialized {
            provider: Provider::Telegram,
        })
    }

    /// Calls a Bot API method and returns its `result`.
    async fn call(&self, method: &str, body: Option<Value>) -> Result<Value, ConduitError> {
        let request = match body {
            Some(body) => ApiRequest::post(method).json(body),
            None => ApiRequest::get(method),
        };
        let response = self.make_request(request).await?;
        unwrap_result(response)
    }

    async fn call_with<T: Serialize + Sync>(
        &self,
        method: &str,
        input: &T,
    ) -> Result<Envelope<Value>, ConduitError> {
        let body = serde_json::to_value(input).map_err(|e| ConduitError::Decode {
            message: format!("failed to encode {method} request: {e}"),
        })?;
        debug!(method, "calling telegram method");
        self.call(method, Some(body)).await.map(Envelope::success)
    }

    pub async fn get_me(&self) -> Result<Envelope<Value>, ConduitError> {
        self.call("getMe", None).await.map(Envelope::success)
    }

    pub async fn send_message(&self, input: &SendMessage) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["chat_id", "text"])?;
        self.call_with("sendMessage", input).await
    }

    pub async fn send_photo(&self, input: &SendPhoto) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["chat_id", "photo"])?;
        self.call_with("sendPhoto", input).await
    }

    pub async fn send_document(
        &self,
        input: &SendDocument,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["chat_id", "document"])?;
        self.call_with("sendDocument", input).await
    }

    pub async fn edit_message_text(
        &self,
        input: &EditMessageText,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["chat_id", "message_id", "text"])?;
        self.call_with("editMessageText", input).await
    }

    pub async fn delete_message(
        &self,
        input: &DeleteMessage,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["chat_id", "message_id"])?;
        self.call_with("deleteMessage", input).await
    }

    pub async fn answer_callback_query(
        &self,
        input: &AnswerCallbackQuery,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["callback_query_id"])?;
        self.call_with("answerCallbackQuery", input).await
    }

    pub async fn set_webhook(&self, input: &SetWebhook) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["url"])?;
        self.call_with("setWebhook", input).await
    }

    pub async fn delete_webhook(
        &self,
        drop_pending_updates: bool,
    ) -> Result<Envelope<Value>, ConduitError> {
        self.call(
            "deleteWebhook",
            Some(json!({ "drop_pending_updates": drop_pending_updates })),
        )
        .await
        .map(Envelope::success)
    }

    pub async fn get_webhook_info(&self) -> Result<Envelope<Value>, ConduitError> {
        self.call("getWebhookInfo", None).await.map(Envelope::success)
    }

    /// Checks the secret-token header of an inbound update against the
    /// configured `webhook_secret`.
    pub fn verify_secret_token(&self, headers: &HeaderMap) -> Result<bool, ConduitError> {
        let Some(expected) = self.credentials()?.webhook_secret.as_deref() else {
            return Err(ConduitError::Config(
                "telegram webhook_secret is not configured".into(),
            ));
        };
        Ok(header_str(headers, SECRET_TOKEN_HEADER)
            .is_some_and(|received| constant_time_compare(received, expected)))
    }
}

/// Turns `{ok: false, description}` into an error and returns `result`.
fn unwrap_result(response: Value) -> Result<Value, ConduitError> {
    if response.get("ok").and_then(Value::as_bool) == Some(false) {
        let message = response
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("request was not ok")
            .to_string();
        return Err(ConduitError::Api {
            provider: Provider::Telegram,
            message,
        });
    }
    Ok(match response {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    })
}

#[async_trait]
impl Integration for TelegramIntegration {
    type Credentials = TelegramCredentials;

    fn client(&self) -> &IntegrationClient {
        &self.client
    }

    fn initialize(&mut self, credentials: TelegramCredentials) -> &mut Self {
        self.credentials = Some(credentials);
        self
    }

    fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<String, ConduitError> {
        let token = &self.credentials()?.bot_token;
        Ok(format!(
            "{}/bot{token}/{}",
            self.client.base_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        ))
    }

    async fn probe(&self) -> Result<Value, ConduitError> {
        self.call("getMe", None).await
    }

    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(webhook::parse_update(body.into_json()?))
    }

    /// Telegram does not sign bodies; `signature` is the secret-token header value.
    fn verify_webhook_signature(
        &self,
        _payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> Result<bool, ConduitError> {
        Ok(constant_time_compare(signature, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::WebhookEventType;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123456:ABC-DEF";

    fn adapter(server: &MockServer) -> TelegramIntegration {
        let mut integration = TelegramIntegration::new()
            .unwrap()
            .with_base_url(server.uri());
        integration.initialize(TelegramCredentials {
            bot_token: TOKEN.into(),
            webhook_secret: Some("hook-secret".into()),
        });
        integration
    }

    #[test]
    fn endpoint_embeds_token() {
        let integration = TelegramIntegration::new().unwrap();
        assert!(matches!(
            integration.endpoint_url("getMe"),
            Err(ConduitError::NotInitialized { .. })
        ));

        let mut integration = integration;
        integration.initialize(TelegramCredentials {
            bot_token: TOKEN.into(),
            webhook_secret: None,
        });
        assert_eq!(
            integration.endpoint_url("sendMessage").unwrap(),
            format!("https://api.telegram.org/bot{TOKEN}/sendMessage")
        );
    }

    #[tokio::test]
    async fn send_message_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/sendMessage")))
            .and(body_json(json!({
                "chat_id": "42",
                "text": "Order shipped",
                "reply_markup": {"inline_keyboard": [[{"text": "Track", "url": "https://t.example/1"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 99, "chat": {"id": 42}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = adapter(&server)
            .send_message(&SendMessage {
                chat_id: "42".into(),
                text: "Order shipped".into(),
                reply_markup: Some(inline_keyboard(vec![vec![InlineButton::url(
                    "Track",
                    "https://t.example/1",
                )]])),
                ..SendMessage::default()
            })
            .await
            .unwrap();
        assert_eq!(envelope.data.unwrap()["message_id"], 99);
    }

    #[tokio::test]
    async fn ok_false_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(path(format!("/bot{TOKEN}/deleteMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "description": "Bad Request: message to delete not found"
            })))
            .mount(&server)
            .await;

        let err = adapter(&server)
            .delete_message(&DeleteMessage {
                chat_id: "42".into(),
                message_id: 5,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConduitError::Api { .. }));
        assert!(err.to_string().contains("message to delete not found"));
    }

    #[tokio::test]
    async fn get_methods_and_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/bot{TOKEN}/getMe")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"id": 1, "is_bot": true, "username": "conduit_bot"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/bot{TOKEN}/getWebhookInfo")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"url": "", "pending_update_count": 0}
            })))
            .mount(&server)
            .await;

        let integration = adapter(&server);
        let me = integration.get_me().await.unwrap();
        assert_eq!(me.data.unwrap()["username"], "conduit_bot");
        let info = integration.get_webhook_info().await.unwrap();
        assert_eq!(info.data.unwrap()["pending_update_count"], 0);

        let mut fresh = TelegramIntegration::new().unwrap().with_base_url(server.uri());
        let result = fresh
            .test_connection(TelegramCredentials {
                bot_token: TOKEN.into(),
                webhook_secret: None,
            })
            .await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn webhook_management_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/setWebhook")))
            .and(body_json(json!({
                "url": "https://hooks.example.com/telegram",
                "secret_token": "hook-secret",
                "allowed_updates": ["message", "callback_query"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/deleteWebhook")))
            .and(body_json(json!({"drop_pending_updates": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        let integration = adapter(&server);
        let set = integration
            .set_webhook(&SetWebhook {
                url: "https://hooks.example.com/telegram".into(),
                secret_token: Some("hook-secret".into()),
                allowed_updates: Some(vec!["message".into(), "callback_query".into()]),
                drop_pending_updates: None,
            })
            .await
            .unwrap();
        assert_eq!(set.data, Some(Value::Bool(true)));
        integration.delete_webhook(true).await.unwrap();
    }

    #[tokio::test]
    async fn edit_requires_message_id() {
        let server = MockServer::start().await;
        let err = adapter(&server)
            .edit_message_text(&EditMessageText {
                chat_id: "42".into(),
                text: "new".into(),
                ..EditMessageText::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: message_id");
    }

    #[test]
    fn secret_token_verification() {
        let mut integration = TelegramIntegration::new().unwrap();
        integration.initialize(TelegramCredentials {
            bot_token: TOKEN.into(),
            webhook_secret: Some("hook-secret".into()),
        });

        let mut headers = HeaderMap::new();
        headers.insert(SECRET_TOKEN_HEADER, HeaderValue::from_static("hook-secret"));
        assert!(integration.verify_secret_token(&headers).unwrap());

        headers.insert(SECRET_TOKEN_HEADER, HeaderValue::from_static("wrong"));
        assert!(!integration.verify_secret_token(&headers).unwrap());
        assert!(!integration.verify_secret_token(&HeaderMap::new()).unwrap());

        assert!(integration
            .verify_webhook_signature(b"{}", "hook-secret", "hook-secret")
            .unwrap());
        assert!(!integration
            .verify_webhook_signature(b"{}", "hook-secreT", "hook-secret")
            .unwrap());
    }

    #[test]
    fn parses_callback_query_webhook() {
        let integration = TelegramIntegration::new().unwrap();
        let body = r#"{"update_id":5,"callback_query":{"id":"q1","data":"yes","from":{"id":7}}}"#;
        let event = integration
            .parse_webhook_payload(WebhookBody::from(body), &HeaderMap::new())
            .unwrap();
        assert_eq!(event.event_type, WebhookEventType::CallbackQuery);
        assert_eq!(event.str_field("data"), Some("yes"));
    }

    #[test]
    fn credentials_debug_hides_token() {
        let creds = TelegramCredentials {
            bot_token: TOKEN.into(),
            webhook_secret: Some("s".into()),
        };
        assert!(!format!("{creds:?}").contains("ABC-DEF"));
    }
}
