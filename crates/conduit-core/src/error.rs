// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Conduit integration.
//!
//! Variants are tagged by cause. Remote failures are classified from the HTTP
//! status code of the provider response, never from message text.

use std::time::Duration;

use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::types::Provider;

/// Where a rate-limit rejection originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RateLimitSource {
    /// The adapter's own sliding window refused the call before any I/O.
    Local,
    /// The provider answered with HTTP 429.
    Remote,
}

/// The primary error type returned by adapters and the request engine.
#[derive(Debug, Error)]
pub enum ConduitError {
    /// An authenticated operation was attempted before `initialize`.
    #[error("credentials not initialized for {provider}")]
    NotInitialized { provider: Provider },

    /// One or more required fields were missing or empty.
    #[error("missing required fields: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    /// A field is present but its value is not acceptable.
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// Either the local window or the provider refused the call.
    #[error("rate limit exceeded for {provider} ({origin}), please try again later")]
    RateLimited {
        provider: Provider,
        origin: RateLimitSource,
        retry_after: Option<Duration>,
    },

    /// HTTP 401 or 403 from the provider.
    #[error("authentication failed ({status}), check the provider credentials: {body}")]
    Unauthorized { status: u16, body: String },

    /// HTTP 404 from the provider.
    #[error("resource not found ({status}): {body}")]
    NotFound { status: u16, body: String },

    /// Any other non-2xx response.
    #[error("HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connect, timeout).
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered 2xx but reported failure in the body.
    #[error("{provider} API error: {message}")]
    Api { provider: Provider, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// An inbound webhook body was not valid JSON.
    #[error("invalid webhook payload: {message}")]
    InvalidWebhookPayload { message: String },

    /// The provider does not sign its webhooks.
    #[error("{provider} does not support webhook signature verification")]
    SignatureUnsupported { provider: Provider },

    /// Invalid credentials shape or adapter configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse error classification, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotInitialized,
    Validation,
    RateLimited,
    Unauthorized,
    NotFound,
    Transport,
    Api,
    Decode,
    Webhook,
    Config,
}

impl ConduitError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a validation error from the missing field names.
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized { .. } => ErrorKind::NotInitialized,
            Self::Validation { .. } | Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Http { .. } | Self::Network { .. } => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::Api,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidWebhookPayload { .. } | Self::SignatureUnsupported { .. } => {
                ErrorKind::Webhook
            }
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::NotFound { status, .. }
            | Self::Http { status, .. } => Some(*status),
            Self::RateLimited {
                origin: RateLimitSource::Remote,
                ..
            } => Some(429),
            _ => None,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Deterministic failures (bad input, missing credentials, unsigned
    /// webhooks) are never worth a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::NotInitialized { .. }
                | Self::Validation { .. }
                | Self::InvalidInput { .. }
                | Self::Config(_)
                | Self::InvalidWebhookPayload { .. }
                | Self::SignatureUnsupported { .. }
        )
    }
}
