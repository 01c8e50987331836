// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shiprocket shipping adapter for Conduit.
//!
//! Shiprocket issues a bearer token from `/auth/login` that stays valid for
//! ten days. The adapter caches it for nine, logs in lazily on the first
//! authenticated call, and drops it when the API answers 401.

pub mod types;
pub mod webhook;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Envelope, Provider, WebhookEvent};
use conduit_integration::{
    ApiRequest, Integration, IntegrationClient, WebhookBody, constant_time_compare,
    encode_path_segment, missing_required_fields, validate_required_fields,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::types::ADDRESS_REQUIRED;

pub use types::{
    Address, CreateOrder, GenerateAwb, OrderItem, PaymentMethod, Serviceability,
    ShiprocketCredentials,
};
pub use webhook::API_KEY_HEADER;

pub const DEFAULT_BASE_URL: &str = "https://apiv2.shiprocket.in/v1/external";

/// How long a login token is reused.
pub const TOKEN_TTL: Duration = Duration::from_secs(9 * 24 * 60 * 60);

const LOGIN_ENDPOINT: &str = "/auth/login";

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug)]
pub struct ShiprocketIntegration {
    client: IntegrationClient,
    credentials: Option<ShiprocketCredentials>,
    token: Mutex<Option<CachedToken>>,
}

impl ShiprocketIntegration {
    pub fn new() -> Result<Self, ConduitError> {
        let client = IntegrationClient::builder(Provider::Shiprocket, DEFAULT_BASE_URL).build()?;
        Ok(Self::with_client(client))
    }

    pub fn from_config(config: &ConduitConfig) -> Result<Self, ConduitError> {
        let section = config.providers.get(Provider::Shiprocket);
        let client = IntegrationClient::builder(Provider::Shiprocket, DEFAULT_BASE_URL)
            .apply_config(section, &config.http)
            .build()?;
        let mut integration = Self::with_client(client);
        if let Some(section) = section
            && !section.credentials.is_empty()
        {
            integration.initialize_from_bag(&section.credentials)?;
        }
        Ok(integration)
    }

    fn with_client(client: IntegrationClient) -> Self {
        Self {
            client,
            credentials: None,
            token: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client.set_base_url(url);
        self
    }

    fn credentials(&self) -> Result<&ShiprocketCredentials, ConduitError> {
        self.credentials.as_ref().ok_or(ConduitError::NotInitialized {
            provider: Provider::Shiprocket,
        })
    }

    /// Returns a valid bearer token, logging in when none is cached or the
    /// cached one has expired.
    ///
    /// The cache lock is held across the login, so concurrent callers wait
    /// for one login instead of racing their own.
    pub async fn authenticate(&self) -> Result<String, ConduitError> {
        let creds = self.credentials()?;
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.value.clone());
        }

        self.client.check_rate_limit()?;
        let request = ApiRequest::post(LOGIN_ENDPOINT).json(json!({
            "email": creds.email,
            "password": creds.password,
        }));
        let data = self
            .client
            .execute(&self.client.url_for(LOGIN_ENDPOINT), HeaderMap::new(), request)
            .await?;
        let value = data["token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConduitError::Api {
                provider: Provider::Shiprocket,
                message: "login response did not include a token".into(),
            })?
            .to_string();

        info!("shiprocket login succeeded");
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + TOKEN_TTL,
        });
        Ok(value)
    }

    /// Forgets the cached token; the next call logs in again.
    pub async fn invalidate_token(&self) {
        self.token.lock().await.take();
    }

    /// Dispatches through the shared pipeline and drops the token on 401.
    async fn call(&self, request: ApiRequest) -> Result<Envelope<Value>, ConduitError> {
        match self.make_request(request).await {
            Ok(data) => Ok(Envelope::success(data)),
            Err(e @ ConduitError::Unauthorized { .. }) => {
                debug!("shiprocket rejected the token, dropping it");
                self.invalidate_token().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates an adhoc order. Without a shipping address the billing
    /// address is reused and `shipping_is_billing` is set.
    pub async fn create_order(&self, input: &CreateOrder) -> Result<Envelope<Value>, ConduitError> {
        let mut missing = missing_required_fields(
            input,
            &[
                "order_id",
                "order_date",
                "pickup_location",
                "order_items",
                "sub_total",
                "length",
                "breadth",
                "height",
                "weight",
            ],
        )?;
        missing.extend(missing_address_fields(&input.billing, "billing")?);
        if let Some(shipping) = &input.shipping {
            missing.extend(missing_address_fields(shipping, "shipping")?);
        }
        if !missing.is_empty() {
            return Err(ConduitError::missing_fields(missing));
        }
        self.call(ApiRequest::post("/orders/create/adhoc").json(order_body(input)?))
            .await
    }

    pub async fn get_order(&self, order_id: u64) -> Result<Envelope<Value>, ConduitError> {
        self.call(ApiRequest::get(format!("/orders/show/{order_id}")))
            .await
    }

    /// Cancels orders by their Shiprocket order ids.
    pub async fn cancel_orders(&self, order_ids: &[u64]) -> Result<Envelope<Value>, ConduitError> {
        if order_ids.is_empty() {
            return Err(ConduitError::missing_fields(["ids"]));
        }
        self.call(ApiRequest::post("/orders/cancel").json(json!({ "ids": order_ids })))
            .await
    }

    pub async fn track_by_awb(&self, awb: &str) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(&json!({ "awb": awb }), &["awb"])?;
        let endpoint = format!("/courier/track/awb/{}", encode_path_segment(awb));
        self.call(ApiRequest::get(endpoint)).await
    }

    pub async fn track_by_shipment(&self, shipment_id: u64) -> Result<Envelope<Value>, ConduitError> {
        self.call(ApiRequest::get(format!(
            "/courier/track/shipment/{shipment_id}"
        )))
        .await
    }

    /// Tracks by the merchant's own order id, optionally scoped to a channel.
    pub async fn track_by_order(
        &self,
        order_id: &str,
        channel_id: Option<u64>,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(&json!({ "order_id": order_id }), &["order_id"])?;
        let request = ApiRequest::get("/courier/track")
            .query("order_id", order_id)
            .query_opt("channel_id", channel_id);
        self.call(request).await
    }

    /// Assigns an AWB (air waybill) to a shipment.
    pub async fn generate_awb(&self, input: &GenerateAwb) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["shipment_id"])?;
        let mut body = json!({ "shipment_id": input.shipment_id });
        if let Some(courier_id) = input.courier_id {
            body["courier_id"] = json!(courier_id);
        }
        self.call(ApiRequest::post("/courier/assign/awb").json(body))
            .await
    }

    pub async fn generate_pickup(
        &self,
        shipment_ids: &[u64],
    ) -> Result<Envelope<Value>, ConduitError> {
        self.shipment_batch("/courier/generate/pickup", shipment_ids)
            .await
    }

    pub async fn generate_label(
        &self,
        shipment_ids: &[u64],
    ) -> Result<Envelope<Value>, ConduitError> {
        self.shipment_batch("/courier/generate/label", shipment_ids)
            .await
    }

    pub async fn generate_manifest(
        &self,
        shipment_ids: &[u64],
    ) -> Result<Envelope<Value>, ConduitError> {
        self.shipment_batch("/manifests/generate", shipment_ids)
            .await
    }

    async fn shipment_batch(
        &self,
        endpoint: &str,
        shipment_ids: &[u64],
    ) -> Result<Envelope<Value>, ConduitError> {
        if shipment_ids.is_empty() {
            return Err(ConduitError::missing_fields(["shipment_id"]));
        }
        self.call(ApiRequest::post(endpoint).json(json!({ "shipment_id": shipment_ids })))
            .await
    }

    /// Lists couriers that can serve the lane.
    pub async fn check_serviceability(
        &self,
        input: &Serviceability,
    ) -> Result<Envelope<Value>, ConduitError> {
        validate_required_fields(input, &["pickup_postcode", "delivery_postcode", "weight"])?;
        let request = ApiRequest::get("/courier/serviceability/")
            .query("pickup_postcode", &input.pickup_postcode)
            .query("delivery_postcode", &input.delivery_postcode)
            .query("weight", input.weight)
            .query("cod", u8::from(input.cod));
        self.call(request).await
    }

    pub async fn get_wallet_balance(&self) -> Result<Envelope<Value>, ConduitError> {
        self.call(ApiRequest::get("/account/details/wallet-balance"))
            .await
    }

    pub async fn get_pickup_locations(&self) -> Result<Envelope<Value>, ConduitError> {
        self.call(ApiRequest::get("/settings/company/pickup"))
            .await
    }
}

/// Missing address fields, prefixed with the address role.
fn missing_address_fields(address: &Address, role: &str) -> Result<Vec<String>, ConduitError> {
    Ok(missing_required_fields(address, ADDRESS_REQUIRED)?
        .into_iter()
        .map(|field| format!("{role}.{field}"))
        .collect())
}

fn order_body(input: &CreateOrder) -> Result<Value, ConduitError> {
    let encode = |what: &str, value: Result<Value, serde_json::Error>| {
        value.map_err(|e| ConduitError::Decode {
            message: format!("failed to encode {what}: {e}"),
        })
    };

    let mut body = Map::new();
    body.insert("order_id".into(), input.order_id.clone().into());
    body.insert("order_date".into(), input.order_date.clone().into());
    body.insert("pickup_location".into(), input.pickup_location.clone().into());
    input.billing.write_flat("billing", &mut body);
    body.insert("shipping_is_billing".into(), input.shipping.is_none().into());
    input
        .shipping
        .as_ref()
        .unwrap_or(&input.billing)
        .write_flat("shipping", &mut body);
    body.insert(
        "order_items".into(),
        encode("order items", serde_json::to_value(&input.order_items))?,
    );
    body.insert(
        "payment_method".into(),
        encode("payment method", serde_json::to_value(input.payment_method))?,
    );
    body.insert("sub_total".into(), json!(input.sub_total));
    body.insert("length".into(), json!(input.length));
    body.insert("breadth".into(), json!(input.breadth));
    body.insert("height".into(), json!(input.height));
    body.insert("weight".into(), json!(input.weight));
    if let Some(charges) = input.shipping_charges {
        body.insert("shipping_charges".into(), json!(charges));
    }
    Ok(Value::Object(body))
}

#[async_trait]
impl Integration for ShiprocketIntegration {
    type Credentials = ShiprocketCredentials;

    fn client(&self) -> &IntegrationClient {
        &self.client
    }

    /// New credentials discard any token issued for the old ones.
    fn initialize(&mut self, credentials: ShiprocketCredentials) -> &mut Self {
        self.credentials = Some(credentials);
        *self.token.get_mut() = None;
        self
    }

    fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    async fn auth_headers(&self) -> Result<HeaderMap, ConduitError> {
        let token = self.authenticate().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ConduitError::Config(format!("invalid Shiprocket token: {e}")))?,
        );
        Ok(headers)
    }

    async fn probe(&self) -> Result<Value, ConduitError> {
        self.make_request(ApiRequest::get("/settings/company/pickup"))
            .await
    }

    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(webhook::parse_tracking_update(body.into_json()?))
    }

    /// Shiprocket does not sign bodies; `signature` is the `x-api-key`
    /// header value and must equal the configured token.
    fn verify_webhook_signature(
        &self,
        _payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> Result<bool, ConduitError> {
        Ok(!secret.is_empty() && constant_time_compare(signature, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_config::load_and_validate_str;
    use conduit_core::WebhookEventType;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ShiprocketCredentials {
        ShiprocketCredentials {
            email: "api@example.com".into(),
            password: "hunter2".into(),
        }
    }

    fn adapter(server: &MockServer) -> ShiprocketIntegration {
        let mut integration = ShiprocketIntegration::new()
            .unwrap()
            .with_base_url(server.uri());
        integration.initialize(credentials());
        integration
    }

    async fn mount_login(server: &MockServer, token: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "api@example.com", "password": "hunter2"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": token, "id": 7})),
            )
            .expect(times)
            .mount(server)
            .await;
    }

    fn address() -> Address {
        Address {
            customer_name: "Asha".into(),
            address: "12 MG Road".into(),
            city: "Bengaluru".into(),
            pincode: "560001".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            phone: "9876543210".into(),
            ..Address::default()
        }
    }

    fn order() -> CreateOrder {
        CreateOrder {
            order_id: "ORD-1001".into(),
            order_date: "2026-10-18 11:00".into(),
            pickup_location: "Primary".into(),
            billing: address(),
            shipping: None,
            order_items: vec![OrderItem {
                name: "Kurta".into(),
                sku: "KRT-M".into(),
                units: 2,
                selling_price: 799.0,
                ..OrderItem::default()
            }],
            payment_method: PaymentMethod::Cod,
            sub_total: 1598.0,
            length: 30.0,
            breadth: 20.0,
            height: 5.0,
            weight: 0.5,
            shipping_charges: None,
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 2).await;
        let integration = adapter(&server);

        let (a, b) = tokio::join!(integration.authenticate(), integration.authenticate());
        assert_eq!(a.unwrap(), "jwt-1");
        assert_eq!(b.unwrap(), "jwt-1");
        assert_eq!(integration.authenticate().await.unwrap(), "jwt-1");

        integration.invalidate_token().await;
        integration.authenticate().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn login_without_token_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;
        let err = adapter(&server).authenticate().await.unwrap_err();
        assert!(matches!(err, ConduitError::Api { .. }));
    }

    #[tokio::test]
    async fn bearer_token_is_attached_and_dropped_on_401() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 2).await;
        Mock::given(method("GET"))
            .and(path("/account/details/wallet-balance"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/account/details/wallet-balance"))
            .and(header("authorization", "Bearer jwt-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"balance_amount": "250.00"}})),
            )
            .mount(&server)
            .await;
        let integration = adapter(&server);

        let err = integration.get_wallet_balance().await.unwrap_err();
        assert!(matches!(err, ConduitError::Unauthorized { status: 401, .. }));

        let envelope = integration.get_wallet_balance().await.unwrap();
        assert_eq!(envelope.data.unwrap()["data"]["balance_amount"], "250.00");
    }

    #[tokio::test]
    async fn order_reuses_billing_for_shipping() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("POST"))
            .and(path("/orders/create/adhoc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "order_id": 348456385,
                "shipment_id": 347851256,
                "status": "NEW"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = adapter(&server).create_order(&order()).await.unwrap();
        assert_eq!(envelope.data.unwrap()["shipment_id"], 347851256);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
        assert_eq!(body["shipping_is_billing"], true);
        assert_eq!(body["billing_customer_name"], "Asha");
        assert_eq!(body["shipping_city"], "Bengaluru");
        assert_eq!(body["payment_method"], "COD");
        assert_eq!(body["order_items"][0]["sku"], "KRT-M");
        assert!(body.get("billing").is_none());
        assert!(body.get("shipping_charges").is_none());
    }

    #[tokio::test]
    async fn order_reports_missing_address_fields() {
        let server = MockServer::start().await;
        let mut input = order();
        input.billing.pincode.clear();
        input.billing.phone = "  ".into();
        let err = adapter(&server).create_order(&input).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: billing.pincode, billing.phone"
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn order_lists_missing_fields_from_every_level() {
        let server = MockServer::start().await;
        let mut input = order();
        input.sub_total = 0.0;
        input.billing.city.clear();
        input.shipping = Some(Address {
            pincode: String::new(),
            ..address()
        });
        let err = adapter(&server).create_order(&input).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: sub_total, billing.city, shipping.pincode"
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_token_triggers_a_new_login() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 2).await;
        let integration = adapter(&server);

        let before = Instant::now();
        integration.authenticate().await.unwrap();
        {
            let mut cached = integration.token.lock().await;
            let token = cached.as_mut().unwrap();
            assert!(token.expires_at >= before + TOKEN_TTL);
            assert!(token.expires_at <= Instant::now() + TOKEN_TTL);
            token.expires_at = Instant::now();
        }

        integration.authenticate().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert!(integration.token.lock().await.as_ref().unwrap().is_fresh());
    }

    #[tokio::test]
    async fn login_counts_against_the_rate_limit() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("GET"))
            .and(path("/account/details/wallet-balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(0)
            .mount(&server)
            .await;

        let config = load_and_validate_str(&format!(
            r#"
            [providers.shiprocket]
            base_url = "{}"
            rate_limit = {{ max_requests = 1, window_ms = 60000 }}

            [providers.shiprocket.credentials]
            email = "api@example.com"
            password = "hunter2"
            "#,
            server.uri()
        ))
        .unwrap();
        let integration = ShiprocketIntegration::from_config(&config).unwrap();

        let err = integration.get_wallet_balance().await.unwrap_err();
        assert!(matches!(err, ConduitError::RateLimited { .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        assert_eq!(integration.client().rate_limiter().in_window(), 1);
    }

    #[tokio::test]
    async fn awb_is_encoded_as_one_path_segment() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("GET"))
            .and(path("/courier/track/awb/1410%2F22%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tracking_data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server).track_by_awb(" 1410/22?x ").await.unwrap();
    }

    #[tokio::test]
    async fn tracking_and_serviceability_queries() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("GET"))
            .and(path("/courier/track"))
            .and(query_param("order_id", "ORD-1001"))
            .and(query_param("channel_id", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"tracking_data": {}}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/courier/serviceability/"))
            .and(query_param("pickup_postcode", "560001"))
            .and(query_param("delivery_postcode", "110001"))
            .and(query_param("cod", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"available_courier_companies": []}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let integration = adapter(&server);

        integration
            .track_by_order("ORD-1001", Some(42))
            .await
            .unwrap();
        integration
            .check_serviceability(&Serviceability {
                pickup_postcode: "560001".into(),
                delivery_postcode: "110001".into(),
                weight: 1.5,
                cod: true,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn shipment_batches_need_ids() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("POST"))
            .and(path("/courier/generate/pickup"))
            .and(body_json(json!({"shipment_id": [347851256]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pickup_status": 1})))
            .expect(1)
            .mount(&server)
            .await;
        let integration = adapter(&server);

        let err = integration.generate_label(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: shipment_id");
        integration.generate_pickup(&[347851256]).await.unwrap();
    }

    #[tokio::test]
    async fn probe_lists_pickup_locations() {
        let server = MockServer::start().await;
        mount_login(&server, "jwt-1", 1).await;
        Mock::given(method("GET"))
            .and(path("/settings/company/pickup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"shipping_address": [{"pickup_location": "Primary"}]}
            })))
            .mount(&server)
            .await;

        let mut integration = ShiprocketIntegration::new()
            .unwrap()
            .with_base_url(server.uri());
        let result = integration.test_connection(credentials()).await;
        assert!(result.success);
    }

    #[test]
    fn api_key_header_check() {
        let integration = ShiprocketIntegration::new().unwrap();
        assert!(integration.verify_webhook_signature(b"{}", "sr-key", "sr-key").unwrap());
        assert!(!integration.verify_webhook_signature(b"{}", "sr-kez", "sr-key").unwrap());
        assert!(!integration.verify_webhook_signature(b"{}", "", "").unwrap());

        let event = integration
            .parse_webhook_payload(
                WebhookBody::Raw(br#"{"awb":"123","current_status":"DELIVERED"}"#),
                &HeaderMap::new(),
            )
            .unwrap();
        assert_eq!(event.event_type, WebhookEventType::ShipmentUpdate);
    }
}
