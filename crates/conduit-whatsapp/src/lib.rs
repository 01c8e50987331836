// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API adapter for Conduit.
//!
//! Messages are posted to `/{phone_number_id}/messages` with a bearer token.
//! Inbound webhooks are signed with the Meta app secret and normalized into
//! `message_received` / `message_status` events.

pub mod types;
pub mod webhook;

use async_trait::async_trait;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Envelope, Provider, WebhookEvent};
use conduit_integration::{
    ApiRequest, Integration, IntegrationClient, WebhookBody, constant_time_compare, digits_only,
    encode_path_segment, validate_required_fields, verify_hmac_sha256_hex,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, warn};

pub use types::{
    InteractiveButtons, InteractiveList, ListRow, ListSection, LocationMessage, MediaKind,
    MediaMessage, ReplyButton, TemplateMessage, TextMessage, WhatsAppCredentials,
};
pub use webhook::SIGNATURE_HEADER;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Reply buttons allowed on one interactive message.
pub const MAX_REPLY_BUTTONS: usize = 3;

const BUSINESS_PROFILE_FIELDS: &str =
    "about,address,description,email,profile_picture_url,websites,vertical";

/// WhatsApp Cloud API adapter. One instance per business phone number.
#[derive(Debug)]
pub struct WhatsAppIntegration {
    client: IntegrationClient,
    credentials: Option<WhatsAppCredentials>,
}

impl WhatsAppIntegration {
    pub fn new() -> Result<Self, ConduitError> {
        let client = IntegrationClient::builder(Provider::WhatsApp, DEFAULT_BASE_URL).build()?;
        Ok(Self {
            client,
            credentials: None,
        })
    }

    /// Builds the adapter from `[providers.whatsapp]`. A section-level
    /// `webhook_secret` stands in for a missing `app_secret`.
    pub fn from_config(config: &ConduitConfig) -> Result<Self, ConduitError> {
        let section = config.providers.get(Provider::WhatsApp);
        let client = IntegrationClient::builder(Provider::WhatsApp, DEFAULT_BASE_URL)
            .apply_config(section, &config.http)
            .build()?;
        let mut integration = Self {
            client,
            credentials: None,
        };
        if let Some(section) = section
            && !section.credentials.is_empty()
        {
            let mut credentials: WhatsAppCredentials = section.credentials.deserialize_into()?;
            if credentials.app_secret.is_none() {
                credentials.app_secret = section.webhook_secret.clone();
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

    fn credentials(&self) -> Result<&WhatsAppCredentials, ConduitError> {
        self.credentials.as_ref().ok_or(ConduitError::NotInitialized {
            provider: Provider::WhatsApp,
        })
    }

    /// Posts a message object to the phone number's `messages` edge.
    async fn send(&self, to: &str, kind: &str, content: Value) -> Result<Envelope<Value>, ConduitError> {
        let phone_number_id = &self.credentials()?.phone_number_id;
        let mut body = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": digits_only(to),
            "type": kind,
        });
        body[kind] = content;
        debug!(message_type = kind, "sending whatsapp message");
        let data = self
            .make_request(ApiRequest::post(format!("/{phone_number_id}/messages")).json(body))
            .await?;
        Ok(Envelope::success(data))
    }

    pub async fn send_text_message(
        &self,
        input: &TextMessage,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "text"])?;
        self.send(
            &input.to,
            "text",
            json!({ "body": input.text, "preview_url": input.preview_url }),
        )
        .await
    }

    pub async fn send_template_message(
        &self,
        input: &TemplateMessage,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "template_name"])?;
        let mut template = json!({
            "name": input.template_name,
            "language": { "code": input.language.as_deref().unwrap_or("en_US") },
        });
        if let Some(components) = &input.components {
            template["components"] = components.clone();
        }
        self.send(&input.to, "template", template).await
    }

    /// Sends image, video, audio or a document by `link` or media `id`.
    pub async fn send_media_message(
        &self,
        input: &MediaMessage,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to"])?;
        let mut media = match (&input.link, &input.id) {
            (Some(link), _) if !link.trim().is_empty() => json!({ "link": link }),
            (_, Some(id)) if !id.trim().is_empty() => json!({ "id": id }),
            _ => return Err(ConduitError::missing_fields(["link", "id"])),
        };
        if let Some(caption) = &input.caption
            && input.kind.supports_caption()
        {
            media["caption"] = Value::String(caption.clone());
        }
        if let Some(filename) = &input.filename
            && input.kind == MediaKind::Document
        {
            media["filename"] = Value::String(filename.clone());
        }
        self.send(&input.to, input.kind.as_str(), media).await
    }

    /// Sends one to three quick-reply buttons.
    pub async fn send_interactive_buttons(
        &self,
        input: &InteractiveButtons,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "body_text", "buttons"])?;
        if input.buttons.len() > MAX_REPLY_BUTTONS {
            return Err(ConduitError::invalid_input(
                "buttons",
                format!(
                    "at most {MAX_REPLY_BUTTONS} reply buttons are allowed, got {}",
                    input.buttons.len()
                ),
            ));
        }
        let buttons: Vec<Value> = input
            .buttons
            .iter()
            .map(|b| json!({ "type": "reply", "reply": { "id": b.id, "title": b.title } }))
            .collect();
        let mut interactive = json!({
            "type": "button",
            "body": { "text": input.body_text },
            "action": { "buttons": buttons },
        });
        decorate(&mut interactive, input.header_text.as_deref(), input.footer_text.as_deref());
        self.send(&input.to, "interactive", interactive).await
    }

    pub async fn send_interactive_list(
        &self,
        input: &InteractiveList,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "body_text", "button_text", "sections"])?;
        let sections = serde_json::to_value(&input.sections).map_err(|e| ConduitError::Decode {
            message: format!("failed to encode list sections: {e}"),
        })?;
        let mut interactive = json!({
            "type": "list",
            "body": { "text": input.body_text },
            "action": { "button": input.button_text, "sections": sections },
        });
        decorate(&mut interactive, input.header_text.as_deref(), input.footer_text.as_deref());
        self.send(&input.to, "interactive", interactive).await
    }

    pub async fn send_location_message(
        &self,
        input: &LocationMessage,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to"])?;
        let mut location = json!({
            "latitude": input.latitude,
            "longitude": input.longitude,
        });
        if let Some(name) = &input.name {
            location["name"] = Value::String(name.clone());
        }
        if let Some(address) = &input.address {
            location["address"] = Value::String(address.clone());
        }
        self.send(&input.to, "location", location).await
    }

    /// Marks an inbound message as read (blue ticks).
    pub async fn mark_as_read(&self, message_id: &str) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(&json!({ "message_id": message_id }), &["message_id"])?;
        let phone_number_id = &self.credentials()?.phone_number_id;
        let body = json!({
            "messaging_product": "whatsapp",
            "status": "read",
            "message_id": message_id,
        });
        let data = self
            .make_request(ApiRequest::post(format!("/{phone_number_id}/messages")).json(body))
            .await?;
        Ok(Envelope::success(data))
    }

    /// Resolves a media id to a short-lived download URL.
    pub async fn get_media_url(&self, media_id: &str) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(&json!({ "media_id": media_id }), &["media_id"])?;
        let data = self
            .make_request(ApiRequest::get(format!("/{}", encode_path_segment(media_id))))
            .await?;
        Ok(Envelope::success(data))
    }

    pub async fn get_business_profile(&self) -> Result<Envelope<Value>, ConduitError> {
        let phone_number_id = &self.credentials()?.phone_number_id;
        let request = ApiRequest::get(format!("/{phone_number_id}/whatsapp_business_profile"))
            .query("fields", BUSINESS_PROFILE_FIELDS);
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    /// Answers Meta's `GET` subscription handshake.
    ///
    /// Returns the challenge to echo when `mode` is `subscribe` and the token
    /// matches the configured `verify_token`.
    pub fn verify_subscription(&self, mode: &str, token: &str, challenge: &str) -> Option<String> {
        let expected = self.credentials.as_ref()?.verify_token.as_deref()?;
        if mode == "subscribe" && constant_time_compare(token, expected) {
            Some(challenge.to_string())
        } else {
            warn!(mode, "whatsapp subscription handshake rejected");
            None
        }
    }
}

fn decorate(interactive: &mut Value, header: Option<&str>, footer: Option<&str>) {
    if let Some(header) = header {
        interactive["header"] = json!({ "type": "text", "text": header });
    }
    if let Some(footer) = footer {
        interactive["footer"] = json!({ "text": footer });
    }
}

#[async_trait]
impl Integration for WhatsAppIntegration {
    type Credentials = WhatsAppCredentials;

    fn client(&self) -> &IntegrationClient {
        &self.client
    }

    fn initialize(&mut self, credentials: WhatsAppCredentials) -> &mut Self {
        self.credentials = Some(credentials);
        self
    }

    fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    async fn auth_headers(&self) -> Result<HeaderMap, ConduitError> {
        let creds = self.credentials()?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", creds.access_token))
                .map_err(|e| ConduitError::Config(format!("invalid WhatsApp access token: {e}")))?,
        );
        Ok(headers)
    }

    async fn probe(&self) -> Result<Value, ConduitError> {
        let phone_number_id = &self.credentials()?.phone_number_id;
        self.make_request(ApiRequest::get(format!("/{phone_number_id}")))
            .await
    }

    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(webhook::parse_notification(body.into_json()?))
    }

    /// `signature` is the `X-Hub-Signature-256` value, `sha256=<hex>`.
    fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> Result<bool, ConduitError> {
        Ok(signature
            .strip_prefix("sha256=")
            .is_some_and(|hex| verify_hmac_sha256_hex(secret.as_bytes(), payload, hex)))
    }
}
