// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cashfree Payments (PG) adapter for Conduit.
//!
//! The sandbox or production base URL is chosen once, when credentials are
//! installed. Requests carry the client id, secret and API version headers.

pub mod types;
pub mod webhook;

use async_trait::async_trait;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Envelope, Provider, WebhookEvent};
use conduit_integration::{
    ApiRequest, Integration, IntegrationClient, WebhookBody, constant_time_compare,
    encode_path_segment, missing_required_fields, validate_required_fields,
    verify_hmac_sha256_base64,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

pub use types::{
    CashfreeCredentials, CashfreeEnvironment, CreateOrder, CreateRefund, CustomerDetails,
    DEFAULT_API_VERSION, PRODUCTION_BASE_URL, SANDBOX_BASE_URL, UpiPaymentLink,
    resolve_base_url,
};
pub use webhook::{
    SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_signature, format_amount, signed_payload,
};

const DEFAULT_CURRENCY: &str = "INR";

/// Order id fetched by the connection probe. Cashfree answers 404 for it
/// once the credentials are accepted.
const PROBE_ORDER_ID: &str = "conduit_connection_probe";

#[derive(Debug)]
pub struct CashfreeIntegration {
    client: IntegrationClient,
    credentials: Option<CashfreeCredentials>,
    base_url_override: Option<String>,
}

impl CashfreeIntegration {
    pub fn new() -> Result<Self, ConduitError> {
        let client = IntegrationClient::builder(Provider::Cashfree, SANDBOX_BASE_URL).build()?;
        Ok(Self {
            client,
            credentials: None,
            base_url_override: None,
        })
    }

    /// Builds the adapter from `[providers.cashfree]`. A configured
    /// `base_url` overrides the environment's URL.
    pub fn from_config(config: &ConduitConfig) -> Result<Self, ConduitError> {
        let section = config.providers.get(Provider::Cashfree);
        let client = IntegrationClient::builder(Provider::Cashfree, SANDBOX_BASE_URL)
            .apply_config(section, &config.http)
            .build()?;
        let mut integration = Self {
            client,
            credentials: None,
            base_url_override: section.and_then(|s| s.base_url.clone()),
        };
        if let Some(section) = section
            && !section.credentials.is_empty()
        {
            integration.initialize_from_bag(&section.credentials)?;
        }
        Ok(integration)
    }

    /// Pins the base URL regardless of the credentials' environment.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.client.set_base_url(url.clone());
        self.base_url_override = Some(url);
        self
    }

    fn credentials(&self) -> Result<&CashfreeCredentials, ConduitError> {
        self.credentials.as_ref().ok_or(ConduitError::NotInitialized {
            provider: Provider::Cashfree,
        })
    }

    pub fn environment(&self) -> Option<CashfreeEnvironment> {
        self.credentials.as_ref().map(|c| c.environment)
    }

    async fn call(&self, request: ApiRequest) -> Result<Envelope<Value>, ConduitError> {
        let data = self.make_request(request).await?;
        Ok(Envelope::success(data))
    }

    pub async fn create_order(&self, input: &CreateOrder) -> Result<Envelope<Value>, ConduitError> {
        let mut missing = missing_required_fields(input, &["order_amount", "customer_details"])?;
        missing.extend(missing_required_fields(
            &input.customer_details,
            &["customer_id", "customer_phone"],
        )?);
        if !missing.is_empty() {
            return Err(ConduitError::missing_fields(missing));
        }

        let order_id = input
            .order_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generated_id("order"));
        let mut body = json!({
            "order_id": order_id,
            "order_amount": input.order_amount,
            "order_currency": input.order_currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            "customer_details": input.customer_details,
        });
        let mut meta = serde_json::Map::new();
        if let Some(url) = &input.return_url {
            meta.insert("return_url".into(), url.clone().into());
        }
        if let Some(url) = &input.notify_url {
            meta.insert("notify_url".into(), url.clone().into());
        }
        if !meta.is_empty() {
            body["order_meta"] = Value::Object(meta);
        }
        if let Some(note) = &input.order_note {
            body["order_note"] = json!(note);
        }
        debug!(order_id = %order_id, "creating cashfree order");
        self.call(ApiRequest::post("/orders").json(body)).await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Envelope<Value>, ConduitError> {
        require("order_id", order_id)?;
        let endpoint = format!("/orders/{}", encode_path_segment(order_id));
        self.call(ApiRequest::get(endpoint)).await
    }

    pub async fn get_order_payments(&self, order_id: &str) -> Result<Envelope<Value>, ConduitError> {
        require("order_id", order_id)?;
        let endpoint = format!("/orders/{}/payments", encode_path_segment(order_id));
        self.call(ApiRequest::get(endpoint)).await
    }

    pub async fn create_refund(&self, input: &CreateRefund) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["order_id", "refund_amount"])?;
        let refund_id = input
            .refund_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generated_id("refund"));
        let mut body = json!({
            "refund_amount": input.refund_amount,
            "refund_id": refund_id,
        });
        if let Some(note) = &input.refund_note {
            body["refund_note"] = json!(note);
        }
        let endpoint = format!("/orders/{}/refunds", encode_path_segment(&input.order_id));
        self.call(ApiRequest::post(endpoint).json(body)).await
    }

    pub async fn get_refund(
        &self,
        order_id: &str,
        refund_id: &str,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(
            &json!({ "order_id": order_id, "refund_id": refund_id }),
            &["order_id", "refund_id"],
        )?;
        let endpoint = format!(
            "/orders/{}/refunds/{}",
            encode_path_segment(order_id),
            encode_path_segment(refund_id)
        );
        self.call(ApiRequest::get(endpoint)).await
    }

    /// Settlement details for one order.
    pub async fn get_settlements(&self, order_id: &str) -> Result<Envelope<Value>, ConduitError> {
        require("order_id", order_id)?;
        let endpoint = format!("/orders/{}/settlements", encode_path_segment(order_id));
        self.call(ApiRequest::get(endpoint)).await
    }

    /// Creates a payment link that opens UPI apps directly (`upi_intent`).
    pub async fn create_upi_payment_link(
        &self,
        input: &UpiPaymentLink,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["amount", "purpose", "customer_phone"])?;
        let link_id = input
            .link_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generated_id("link"));

        let mut customer = json!({ "customer_phone": input.customer_phone });
        if let Some(name) = &input.customer_name {
            customer["customer_name"] = json!(name);
        }
        if let Some(email) = &input.customer_email {
            customer["customer_email"] = json!(email);
        }
        let mut meta = json!({ "upi_intent": true });
        if let Some(url) = &input.return_url {
            meta["return_url"] = json!(url);
        }
        if let Some(url) = &input.notify_url {
            meta["notify_url"] = json!(url);
        }
        let mut body = json!({
            "link_id": link_id,
            "link_amount": input.amount,
            "link_currency": DEFAULT_CURRENCY,
            "link_purpose": input.purpose,
            "customer_details": customer,
            "link_meta": meta,
            "link_notify": { "send_sms": input.notify_customer, "send_email": false },
        });
        if let Some(expiry) = &input.expiry_time {
            body["link_expiry_time"] = json!(expiry);
        }
        self.call(ApiRequest::post("/links").json(body)).await
    }

    pub async fn get_payment_link(&self, link_id: &str) -> Result<Envelope<Value>, ConduitError> {
        require("link_id", link_id)?;
        let endpoint = format!("/links/{}", encode_path_segment(link_id));
        self.call(ApiRequest::get(endpoint)).await
    }

    /// Checks a payment signature against the installed client secret.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        order_amount: f64,
        timestamp: &str,
        signature: &str,
    ) -> Result<bool, ConduitError> {
        let secret = &self.credentials()?.client_secret;
        let expected = compute_signature(order_id, order_amount, timestamp, secret)?;
        Ok(constant_time_compare(signature.trim(), &expected))
    }
}

fn require(field: &str, value: &str) -> Result<(), ConduitError> {
    if value.trim().is_empty() {
        Err(ConduitError::missing_fields([field]))
    } else {
        Ok(())
    }
}

fn generated_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, ConduitError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConduitError::Config(format!("invalid Cashfree {what}: {e}")))
}

#[async_trait]
impl Integration for CashfreeIntegration {
    type Credentials = CashfreeCredentials;

    fn client(&self) -> &IntegrationClient {
        &self.client
    }

    fn initialize(&mut self, credentials: CashfreeCredentials) -> &mut Self {
        let base_url = resolve_base_url(credentials.environment, self.base_url_override.as_deref());
        self.client.set_base_url(base_url);
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
            HeaderName::from_static("x-client-id"),
            header_value(&creds.client_id, "client id")?,
        );
        headers.insert(
            HeaderName::from_static("x-client-secret"),
            header_value(&creds.client_secret, "client secret")?,
        );
        headers.insert(
            HeaderName::from_static("x-api-version"),
            header_value(creds.api_version(), "API version")?,
        );
        Ok(headers)
    }

    /// A 404 for the sentinel order still proves the credentials work.
    async fn probe(&self) -> Result<Value, ConduitError> {
        match self
            .make_request(ApiRequest::get(format!("/orders/{PROBE_ORDER_ID}")))
            .await
        {
            Ok(data) => Ok(data),
            Err(ConduitError::NotFound { .. }) => Ok(json!({
                "reachable": true,
                "environment": self.environment().map(|e| e.to_string()),
            })),
            Err(e) => Err(e),
        }
    }

    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(webhook::parse_payment_webhook(body.into_json()?))
    }

    /// `payload` is the signed string, see [`signed_payload`].
    fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> Result<bool, ConduitError> {
        Ok(verify_hmac_sha256_base64(secret.as_bytes(), payload, signature))
    }
}
