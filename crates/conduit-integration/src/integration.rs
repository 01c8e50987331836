// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The adapter contract shared by every provider.
//!
//! Adapters hold an [`IntegrationClient`] and implement the provider-specific
//! hooks: credentials, auth headers, URL building, the connection probe and
//! webhook parsing. Everything else (rate limiting, dispatch, error
//! classification) comes from the default methods.

use async_trait::async_trait;
use conduit_core::{ConduitError, ConnectionTest, CredentialBag, Provider, WebhookEvent};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::IntegrationClient;
use crate::request::ApiRequest;
use crate::webhook::{WebhookBody, passthrough_event};

/// A provider adapter built on the shared request engine.
#[async_trait]
pub trait Integration: Send + Sync {
    /// Typed credentials accepted by [`Integration::initialize`].
    type Credentials: DeserializeOwned + Send + Sync + 'static;

    fn client(&self) -> &IntegrationClient;

    fn provider(&self) -> Provider {
        self.client().provider()
    }

    /// Stores credentials. Calling it again replaces them.
    fn initialize(&mut self, credentials: Self::Credentials) -> &mut Self;

    fn is_initialized(&self) -> bool;

    /// Initializes from an opaque config bag.
    fn initialize_from_bag(&mut self, bag: &CredentialBag) -> Result<&mut Self, ConduitError>
    where
        Self: Sized,
    {
        let credentials = bag.deserialize_into::<Self::Credentials>()?;
        Ok(self.initialize(credentials))
    }

    /// Fails with `NotInitialized` until credentials are present.
    fn ensure_initialized(&self) -> Result<(), ConduitError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ConduitError::NotInitialized {
                provider: self.provider(),
            })
        }
    }

    /// Provider auth headers. May perform I/O (token login).
    async fn auth_headers(&self) -> Result<HeaderMap, ConduitError> {
        Ok(HeaderMap::new())
    }

    /// Full URL for an endpoint. Overridden where the path embeds credentials.
    fn endpoint_url(&self, endpoint: &str) -> Result<String, ConduitError> {
        Ok(self.client().url_for(endpoint))
    }

    /// Runs one request through the pipeline.
    ///
    /// Order: credentials present, URL, auth headers, local rate limit,
    /// dispatch. The limit is checked after auth so a login performed by
    /// `auth_headers` is already in the window; a refused call is not
    /// tracked.
    async fn make_request(&self, request: ApiRequest) -> Result<Value, ConduitError> {
        self.ensure_initialized()?;
        let url = self.endpoint_url(&request.endpoint)?;
        let auth = self.auth_headers().await?;
        self.client().check_rate_limit()?;
        self.client().execute(&url, auth, request).await
    }

    /// A cheap authenticated call proving the credentials work.
    async fn probe(&self) -> Result<Value, ConduitError>;

    /// Initializes, probes, and reports the outcome without raising.
    async fn test_connection(&mut self, credentials: Self::Credentials) -> ConnectionTest
    where
        Self: Sized,
    {
        self.initialize(credentials);
        let provider = self.provider();
        match self.probe().await {
            Ok(details) => {
                info!(provider = %provider, "connection test succeeded");
                ConnectionTest::connected(provider, details)
            }
            Err(e) => {
                warn!(provider = %provider, kind = %e.kind(), error = %e, "connection test failed");
                ConnectionTest::failed(provider, &e)
            }
        }
    }

    /// Normalizes an inbound webhook. The default wraps it as `unknown`.
    fn parse_webhook_payload(
        &self,
        body: WebhookBody<'_>,
        _headers: &HeaderMap,
    ) -> Result<WebhookEvent, ConduitError> {
        Ok(passthrough_event(body.into_json()?))
    }

    /// Checks a webhook signature. Providers that do not sign refuse.
    fn verify_webhook_signature(
        &self,
        _payload: &[u8],
        _signature: &str,
        _secret: &str,
    ) -> Result<bool, ConduitError> {
        Err(ConduitError::SignatureUnsupported {
            provider: self.provider(),
        })
    }
}
