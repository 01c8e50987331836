// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP dispatch shared by every adapter.
//!
//! [`IntegrationClient`] owns the connection pool, the base URL and the
//! rate limiter of one adapter instance. It turns an [`ApiRequest`] into a
//! reqwest call, classifies failures by status code and decodes the body.

use std::time::Duration;

use conduit_config::{HttpConfig, ProviderConfig};
use conduit_core::{ConduitError, Provider, RateLimitSource};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::request::ApiRequest;

/// Builder for [`IntegrationClient`].
#[derive(Debug, Clone)]
pub struct IntegrationClientBuilder {
    provider: Provider,
    base_url: String,
    rate_limit: RateLimitConfig,
    timeout: Duration,
    user_agent: String,
}

impl IntegrationClientBuilder {
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Applies the shared HTTP settings and the provider's config section.
    #[must_use]
    pub fn apply_config(mut self, section: Option<&ProviderConfig>, http: &HttpConfig) -> Self {
        self.timeout = Duration::from_secs(http.timeout_secs);
        self.user_agent = http.user_agent.clone();
        if let Some(section) = section {
            if let Some(url) = &section.base_url {
                self.base_url = url.clone();
            }
            if let Some(limit) = section.rate_limit {
                self.rate_limit = RateLimitConfig::new(limit.max_requests, limit.window_ms);
            }
        }
        self
    }

    pub fn build(self) -> Result<IntegrationClient, ConduitError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| ConduitError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(IntegrationClient {
            provider: self.provider,
            http,
            base_url: self.base_url,
            limiter: RateLimiter::new(self.provider, self.rate_limit),
        })
    }
}

/// Connection pool, base URL and rate limiter of one adapter instance.
#[derive(Debug)]
pub struct IntegrationClient {
    provider: Provider,
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl IntegrationClient {
    /// Starts a builder with the provider's default rate limit.
    pub fn builder(provider: Provider, base_url: impl Into<String>) -> IntegrationClientBuilder {
        IntegrationClientBuilder {
            provider,
            base_url: base_url.into(),
            rate_limit: RateLimitConfig::for_provider(provider),
            timeout: Duration::from_secs(30),
            user_agent: concat!("conduit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into();
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Refuses the call when the local window is full. No I/O happens.
    pub fn check_rate_limit(&self) -> Result<(), ConduitError> {
        self.limiter.check()
    }

    /// Joins the base URL and an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if endpoint.is_empty() || endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        }
    }

    /// Sends `request` to `url` and decodes the response.
    ///
    /// Header precedence, lowest first: `Content-Type: application/json`,
    /// `auth_headers`, then the request's own headers. The attempt is
    /// recorded in the rate limiter whether or not it succeeds.
    pub async fn execute(
        &self,
        url: &str,
        auth_headers: HeaderMap,
        request: ApiRequest,
    ) -> Result<Value, ConduitError> {
        let mut url = Url::parse(url)
            .map_err(|e| ConduitError::Config(format!("invalid {} URL: {e}", self.provider)))?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.iter());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in auth_headers.iter().chain(request.headers.iter()) {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if request.sends_body()
            && let Some(body) = &request.body
        {
            let bytes = serde_json::to_vec(body).map_err(|e| ConduitError::Decode {
                message: format!("failed to encode request body: {e}"),
            })?;
            builder = builder.body(bytes);
        }

        let started = Instant::now();
        let sent = builder.send().await;
        self.limiter.track();
        let response = sent.map_err(network_error)?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let text = response.text().await.map_err(network_error)?;

        debug!(
            provider = %self.provider,
            method = %request.method,
            endpoint = %request.endpoint,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "provider response received"
        );

        if !status.is_success() {
            let err = classify_response(self.provider, status, text, retry_after);
            warn!(
                provider = %self.provider,
                endpoint = %request.endpoint,
                status = status.as_u16(),
                kind = %err.kind(),
                "provider request failed"
            );
            return Err(err);
        }

        decode_body(&text, is_json)
    }
}

/// Maps a non-2xx response to the matching error variant.
pub fn classify_response(
    provider: Provider,
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> ConduitError {
    match status.as_u16() {
        401 | 403 => ConduitError::Unauthorized {
            status: status.as_u16(),
            body,
        },
        404 => ConduitError::NotFound {
            status: status.as_u16(),
            body,
        },
        429 => ConduitError::RateLimited {
            provider,
            origin: RateLimitSource::Remote,
            retry_after,
        },
        code => ConduitError::Http {
            status: code,
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        },
    }
}

/// Parses a `Retry-After` header given in seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Empty bodies become `Null`, non-JSON bodies become a string.
fn decode_body(text: &str, is_json: bool) -> Result<Value, ConduitError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    if !is_json {
        return Ok(Value::String(text.to_string()));
    }
    serde_json::from_str(text).map_err(|e| ConduitError::Decode {
        message: format!("invalid JSON response: {e}"),
    })
}

/// Converts a transport error, dropping the URL (it may embed a token).
fn network_error(e: reqwest::Error) -> ConduitError {
    let e = e.without_url();
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    ConduitError::Network {
        message,
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> IntegrationClient {
        IntegrationClient::builder(Provider::Msg91, base)
            .build()
            .unwrap()
    }

    #[test]
    fn url_for_joins_with_single_slash() {
        assert_eq!(
            client("https://control.msg91.com/api/v5/").url_for("/sms/send"),
            "https://control.msg91.com/api/v5/sms/send"
        );
        assert_eq!(
            client("https://control.msg91.com/api/v5").url_for("balance"),
            "https://control.msg91.com/api/v5/balance"
        );
    }

    #[test]
    fn builder_uses_provider_default_limit() {
        let c = IntegrationClient::builder(Provider::WhatsApp, "https://x")
            .build()
            .unwrap();
        assert_eq!(c.rate_limiter().config().max_requests, 80);
    }

    #[test]
    fn apply_config_overrides_url_and_limit() {
        let section = ProviderConfig {
            base_url: Some("http://127.0.0.1:1".to_string()),
            rate_limit: Some(conduit_config::RateLimitSettings {
                max_requests: 5,
                window_ms: 1000,
            }),
            ..ProviderConfig::default()
        };
        let c = IntegrationClient::builder(Provider::Cashfree, "https://api.cashfree.com/pg")
            .apply_config(Some(&section), &HttpConfig::default())
            .build()
            .unwrap();
        assert_eq!(c.base_url(), "http://127.0.0.1:1");
        assert_eq!(c.rate_limiter().config(), RateLimitConfig::new(5, 1000));
    }

    #[test]
    fn classify_by_status() {
        let p = Provider::Telegram;
        assert!(matches!(
            classify_response(p, StatusCode::FORBIDDEN, String::new(), None),
            ConduitError::Unauthorized { status: 403, .. }
        ));
        assert!(matches!(
            classify_response(p, StatusCode::NOT_FOUND, String::new(), None),
            ConduitError::NotFound { status: 404, .. }
        ));
        assert!(matches!(
            classify_response(
                p,
                StatusCode::TOO_MANY_REQUESTS,
                String::new(),
                Some(Duration::from_secs(2))
            ),
            ConduitError::RateLimited {
                origin: RateLimitSource::Remote,
                retry_after: Some(d),
                ..
            } if d == Duration::from_secs(2)
        ));
        let err = classify_response(p, StatusCode::BAD_GATEWAY, "upstream".into(), None);
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream");
    }

    #[test]
    fn decode_body_variants() {
        assert_eq!(decode_body("", true).unwrap(), Value::Null);
        assert_eq!(
            decode_body("OK", false).unwrap(),
            Value::String("OK".to_string())
        );
        assert_eq!(decode_body(r#"{"a":1}"#, true).unwrap()["a"], 1);
        assert!(matches!(
            decode_body("{oops", true),
            Err(ConduitError::Decode { .. })
        ));
    }

    #[test]
    fn retry_after_parses_seconds_only() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }
}
