// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MSG91 adapter for Conduit.
//!
//! Sends SMS, OTPs and WhatsApp messages through the MSG91 v5 API. Phone
//! numbers are reduced to digits before they leave the process.

pub mod types;
pub mod webhook;

use async_trait::async_trait;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Envelope, Provider, WebhookEvent};
use conduit_integration::{
    ApiRequest, Integration, IntegrationClient, WebhookBody, digits_only, encode_path_segment,
    validate_required_fields,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;

pub use types::{
    DEFAULT_COUNTRY, DEFAULT_ROUTE, Msg91Credentials, ResendOtp, SendOtp, SendSms, VerifyOtp,
    WhatsAppMedia, WhatsAppTemplate,
};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://control.msg91.com/api/v5";

/// MSG91 adapter. One instance per auth key.
#[derive(Debug)]
pub struct Msg91Integration {
    client: IntegrationClient,
    credentials: Option<Msg91Credentials>,
}

impl Msg91Integration {
    pub fn new() -> Result<Self, ConduitError> {
        let client = IntegrationClient::builder(Provider::Msg91, DEFAULT_BASE_URL).build()?;
        Ok(Self {
            client,
            credentials: None,
        })
    }

    /// Builds the adapter from `[providers.msg91]`, initializing it when
    /// credentials are configured.
    pub fn from_config(config: &ConduitConfig) -> Result<Self, ConduitError> {
        let section = config.providers.get(Provider::Msg91);
        let client = IntegrationClient::builder(Provider::Msg91, DEFAULT_BASE_URL)
            .apply_config(section, &config.http)
            .build()?;
        let mut integration = Self {
            client,
            credentials: None,
        };
        if let Some(section) = section
            && !section.credentials.is_empty()
        {
            integration.initialize_from_bag(&section.credentials)?;
        }
        Ok(integration)
    }

    /// Points the adapter at another host (staging, mock server).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client.set_base_url(url);
        self
    }

    fn credentials(&self) -> Result<&Msg91Credentials, ConduitError> {
        self.credentials.as_ref().ok_or(ConduitError::NotInitialized {
            provider: Provider::Msg91,
        })
    }

    fn whatsapp_number(&self) -> Result<String, ConduitError> {
        self.credentials()?
            .whatsapp_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ConduitError::missing_fields(["whatsapp_number"]))
    }

    /// Sends one SMS. The recipient is reduced to digits.
    pub async fn send_sms(&self, input: &SendSms) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "message"])?;
        let creds = self.credentials()?;
        let sender = [input.sender_id.as_deref(), creds.sender_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty());

        let mut body = json!({
            "route": input.route.as_deref().unwrap_or(DEFAULT_ROUTE),
            "country": input.country.as_deref().unwrap_or(DEFAULT_COUNTRY),
            "sms": [{
                "message": input.message,
                "to": [digits_only(&input.to)],
            }],
        });
        if let Some(sender) = sender {
            body["sender"] = json!(sender);
        }
        debug!(route = body["route"].as_str().unwrap_or_default(), "sending sms");
        let data = self
            .make_request(ApiRequest::post("/sms/send").json(body))
            .await?;
        Ok(Envelope::success(data))
    }

    /// Sends an OTP from a DLT template. MSG91 takes the fields as query parameters.
    pub async fn send_otp(&self, input: &SendOtp) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["mobile", "template_id"])?;
        let request = ApiRequest::post("/otp")
            .query("template_id", &input.template_id)
            .query("mobile", digits_only(&input.mobile))
            .query_opt("otp", input.otp.as_deref())
            .query_opt("otp_length", input.otp_length)
            .query_opt("otp_expiry", input.otp_expiry);
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    pub async fn verify_otp(&self, input: &VerifyOtp) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["mobile", "otp"])?;
        let request = ApiRequest::get("/otp/verify")
            .query("mobile", digits_only(&input.mobile))
            .query("otp", &input.otp);
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    /// Re-sends the last OTP by `text` (default) or `voice`.
    pub async fn resend_otp(&self, input: &ResendOtp) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["mobile"])?;
        let request = ApiRequest::get("/otp/retry")
            .query("mobile", digits_only(&input.mobile))
            .query("retrytype", input.retry_type.as_deref().unwrap_or("text"));
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    pub async fn send_whatsapp_template(
        &self,
        input: &WhatsAppTemplate,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "template_name"])?;
        let integrated_number = self.whatsapp_number()?;
        let body = json!({
            "integrated_number": integrated_number,
            "content_type": "template",
            "payload": {
                "messaging_product": "whatsapp",
                "type": "template",
                "template": {
                    "name": input.template_name,
                    "language": {
                        "code": input.language.as_deref().unwrap_or("en"),
                        "policy": "deterministic",
                    },
                    "to_and_components": [{
                        "to": [digits_only(&input.to)],
                        "components": input.components.clone().unwrap_or_else(|| json!({})),
                    }],
                },
            },
        });
        let data = self
            .make_request(ApiRequest::post("/whatsapp/whatsapp-outbound-message/bulk/").json(body))
            .await?;
        Ok(Envelope::success(data))
    }

    pub async fn send_whatsapp_media(
        &self,
        input: &WhatsAppMedia,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["to", "media_type", "media_url"])?;
        let integrated_number = self.whatsapp_number()?;
        let mut body = json!({
            "integrated_number": integrated_number,
            "recipient_number": digits_only(&input.to),
            "content_type": input.media_type,
            "attachment_url": input.media_url,
        });
        if let Some(caption) = &input.caption {
            body["caption"] = Value::String(caption.clone());
        }
        let data = self
            .make_request(ApiRequest::post("/whatsapp/whatsapp-outbound-message/").json(body))
            .await?;
        Ok(Envelope::success(data))
    }

    /// Credit balance for a route (defaults to the transactional route).
    pub async fn get_balance(&self, route: Option<&str>) -> Result<Envelope<Value>, ConduitError> {
        let request = ApiRequest::get("/balance").query("type", route.unwrap_or(DEFAULT_ROUTE));
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    pub async fn get_delivery_report(
        &self,
        request_id: &str,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(&json!({ "request_id": request_id }), &["request_id"])?;
        let data = self
            .make_request(ApiRequest::get(format!("/report/{}", encode_path_segment(request_id))))
            .await?;
        Ok(Envelope::success(data))
    }
}

#[async_trait]
impl Integration for Msg91Integration {
    type Credentials = Msg91Credentials;

    fn client(&self) -> &IntegrationClient {
        &self.client
    }

    fn initialize(&mut self, credentials: Msg91Credentials) -> &mut Self {
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
            "authkey",
            HeaderValue::from_str(&creds.auth_key)
                .map_err(|e| ConduitError::Config(format!("invalid MSG91 auth key: {e}")))?,
        );
        Ok(headers)
    }

    async fn probe(&self) -> Result<Value, ConduitError> {
        self.get_balance(None)
            .await
            .map(|envelope| envelope.into_data().unwrap_or(Value::Null))
    }

    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(webhook::parse_delivery_report(body.into_json()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::{CredentialBag, WebhookEventType};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> Msg91Integration {
        let mut integration = Msg91Integration::new().unwrap().with_base_url(server.uri());
        integration.initialize(Msg91Credentials {
            auth_key: "msg91-key".into(),
            sender_id: Some("ACMEIN".into()),
            whatsapp_number: Some("919999999999".into()),
        });
        integration
    }

    #[tokio::test]
    async fn send_sms_strips_phone_formatting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .and(header("authkey", "msg91-key"))
            .and(body_json(json!({
                "sender": "ACMEIN",
                "route": "4",
                "country": "91",
                "sms": [{"message": "Hi", "to": ["919876543210"]}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"type": "success", "message": "3763646c3058313530393531"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let envelope = adapter(&server)
            .send_sms(&SendSms {
                to: "+91 98765-43210".into(),
                message: "Hi".into(),
                ..SendSms::default()
            })
            .await
            .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()["type"], "success");
    }

    #[tokio::test]
    async fn send_sms_reports_all_missing_fields_without_io() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = adapter(&server)
            .send_sms(&SendSms::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: to, message");
    }

    #[tokio::test]
    async fn send_sms_before_initialize_is_refused() {
        let server = MockServer::start().await;
        let integration = Msg91Integration::new().unwrap().with_base_url(server.uri());
        let err = integration
            .send_sms(&SendSms {
                to: "+91 98765-43210".into(),
                message: "Hi".into(),
                ..SendSms::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConduitError::NotInitialized { provider: Provider::Msg91 }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_sms_without_sender_id_omits_sender() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .and(body_json(json!({
                "route": "4",
                "country": "91",
                "sms": [{"message": "Hi", "to": ["919876543210"]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut integration = Msg91Integration::new().unwrap().with_base_url(server.uri());
        integration.initialize(Msg91Credentials {
            auth_key: "msg91-key".into(),
            sender_id: None,
            whatsapp_number: None,
        });
        integration
            .send_sms(&SendSms {
                to: "+91 98765-43210".into(),
                message: "Hi".into(),
                sender_id: Some(" ".into()),
                ..SendSms::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_otp_uses_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/otp"))
            .and(query_param("template_id", "tmpl-1"))
            .and(query_param("mobile", "919876543210"))
            .and(query_param("otp_length", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server)
            .send_otp(&SendOtp {
                mobile: "+91-98765 43210".into(),
                template_id: "tmpl-1".into(),
                otp_length: Some(6),
                ..SendOtp::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn verify_and_resend_otp() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/otp/verify"))
            .and(query_param("otp", "1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "success"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/otp/retry"))
            .and(query_param("retrytype", "text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "success"})))
            .mount(&server)
            .await;

        let integration = adapter(&server);
        integration
            .verify_otp(&VerifyOtp {
                mobile: "919876543210".into(),
                otp: "1234".into(),
            })
            .await
            .unwrap();
        integration
            .resend_otp(&ResendOtp {
                mobile: "919876543210".into(),
                retry_type: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn whatsapp_template_uses_integrated_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/whatsapp/whatsapp-outbound-message/bulk/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(&server)
            .await;

        adapter(&server)
            .send_whatsapp_template(&WhatsAppTemplate {
                to: "+91 98765 43210".into(),
                template_name: "order_update".into(),
                ..WhatsAppTemplate::default()
            })
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["integrated_number"], "919999999999");
        assert_eq!(body["payload"]["template"]["language"]["code"], "en");
        assert_eq!(
            body["payload"]["template"]["to_and_components"][0]["to"][0],
            "919876543210"
        );
    }

    #[tokio::test]
    async fn whatsapp_media_requires_integrated_number() {
        let server = MockServer::start().await;
        let mut integration = Msg91Integration::new().unwrap().with_base_url(server.uri());
        integration.initialize(Msg91Credentials {
            auth_key: "k".into(),
            sender_id: None,
            whatsapp_number: None,
        });
        let err = integration
            .send_whatsapp_media(&WhatsAppMedia {
                to: "919876543210".into(),
                media_type: "image".into(),
                media_url: "https://cdn.example.com/a.png".into(),
                caption: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: whatsapp_number");
    }

    #[tokio::test]
    async fn delivery_report_and_balance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/report/req-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "delivered"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/balance"))
            .and(query_param("type", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1520.00"))
            .mount(&server)
            .await;

        let integration = adapter(&server);
        let report = integration.get_delivery_report("req-42").await.unwrap();
        assert_eq!(report.data.unwrap()["status"], "delivered");

        let balance = integration.get_balance(None).await.unwrap();
        assert_eq!(balance.data, Some(Value::String("1520.00".into())));
    }

    #[tokio::test]
    async fn connection_test_fails_on_bad_key() {
        let server = MockServer::start().await;
        Mock::given(path("/balance"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid authkey"))
            .mount(&server)
            .await;

        let mut integration = Msg91Integration::new().unwrap().with_base_url(server.uri());
        let result = integration
            .test_connection(Msg91Credentials {
                auth_key: "wrong".into(),
                sender_id: None,
                whatsapp_number: None,
            })
            .await;
        assert!(!result.success);
        assert!(result.message.contains("authentication failed"));
    }

    #[test]
    fn webhook_is_normalized_and_unsigned() {
        let mut integration = Msg91Integration::new().unwrap();
        let bag: CredentialBag = [("auth_key", "k")].into_iter().collect();
        integration.initialize_from_bag(&bag).unwrap();

        let event = integration
            .parse_webhook_payload(
                WebhookBody::from(r#"{"requestId":"r-9","status":"1","number":"91900"}"#),
                &HeaderMap::new(),
            )
            .unwrap();
        assert_eq!(event.event_type, WebhookEventType::DeliveryReport);
        assert_eq!(event.str_field("request_id"), Some("r-9"));

        assert!(matches!(
            integration.verify_webhook_signature(b"{}", "sig", "secret"),
            Err(ConduitError::SignatureUnsupported { .. })
        ));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Msg91Credentials {
            auth_key: "super-secret".into(),
            sender_id: None,
            whatsapp_number: None,
        };
        assert!(!format!("{creds:?}").contains("super-secret"));
    }
}
