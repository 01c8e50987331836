// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the request engine and provider adapters.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use crate::error::ConduitError;

/// Default sliding-window length shared by every provider.
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Identifies an external provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Msg91,
    Telegram,
    WhatsApp,
    Shiprocket,
    Cashfree,
}

impl Provider {
    /// Requests allowed per [`DEFAULT_WINDOW_MS`] unless overridden.
    pub fn default_max_requests(self) -> u32 {
        match self {
            Self::Msg91 => 150,
            Self::WhatsApp => 80,
            Self::Telegram | Self::Shiprocket | Self::Cashfree => 100,
        }
    }
}

/// Uniform result wrapper returned by every public adapter method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// Wraps a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Wraps a failure, keeping only its message.
    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Converts a result into the matching envelope.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e),
        }
    }

    /// Returns the payload of a successful envelope.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Normalized event types produced by webhook parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Telegram inbound message update.
    Message,
    /// Telegram inline-keyboard button press.
    CallbackQuery,
    /// WhatsApp inbound message.
    MessageReceived,
    /// WhatsApp delivery/read status.
    MessageStatus,
    /// MSG91 SMS delivery report.
    DeliveryReport,
    /// Shiprocket tracking update.
    ShipmentUpdate,
    PaymentSuccess,
    PaymentFailed,
    PaymentUserDropped,
    RefundStatus,
    /// Any payload shape the adapter does not recognize.
    Unknown,
}

/// A provider-agnostic webhook event.
///
/// `raw_payload` always holds the untouched inbound payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub raw_payload: Value,
}

impl WebhookEvent {
    pub fn new(event_type: WebhookEventType, raw_payload: Value) -> Self {
        Self {
            event_type,
            fields: Map::new(),
            raw_payload,
        }
    }

    /// Adds a provider-specific field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field as a string slice when it is a JSON string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Opaque provider-specific credential bag.
///
/// Values are never printed by `Debug`. Numeric and boolean values are
/// accepted and stored as strings, since env providers type them eagerly.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialBag(BTreeMap<String, String>);

impl CredentialBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserializes the bag into an adapter's typed credentials.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, ConduitError> {
        let value = serde_json::to_value(&self.0)
            .map_err(|e| ConduitError::Config(format!("invalid credentials: {e}")))?;
        serde_json::from_value(value)
            .map_err(|e| ConduitError::Config(format!("invalid credentials: {e}")))
    }
}

impl<'de> Deserialize<'de> for CredentialBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                Value::Number(n) => Ok((key, n.to_string())),
                Value::Bool(b) => Ok((key, b.to_string())),
                other => Err(de::Error::custom(format!(
                    "credential `{key}` must be a string, found {other}"
                ))),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
}

impl fmt::Debug for CredentialBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outcome of a connection test. Failures are reported, never raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub provider: Provider,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl ConnectionTest {
    pub fn connected(provider: Provider, details: Value) -> Self {
        Self {
            provider,
            success: true,
            message: format!("{provider} connection successful"),
            details: Some(details),
            timestamp: Utc::now(),
        }
    }

    pub fn failed(provider: Provider, error: &ConduitError) -> Self {
        Self {
            provider,
            success: false,
            message: error.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}
