// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cashfree credentials, environments and request inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
pub const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";

/// API version sent in `x-api-version` unless overridden.
pub const DEFAULT_API_VERSION: &str = "2023-08-01";

/// Which Cashfree PG deployment the credentials belong to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CashfreeEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl CashfreeEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Picks the base URL for a set of credentials. An explicit override wins.
pub fn resolve_base_url(environment: CashfreeEnvironment, override_url: Option<&str>) -> String {
    override_url
        .map(str::to_string)
        .unwrap_or_else(|| environment.base_url().to_string())
}

#[derive(Clone, Deserialize)]
pub struct CashfreeCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub environment: CashfreeEnvironment,
    #[serde(default)]
    pub api_version: Option<String>,
}

impl CashfreeCredentials {
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }
}

impl fmt::Debug for CashfreeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CashfreeCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrder {
    /// Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub order_amount: f64,
    /// Defaults to `INR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_currency: Option<String>,
    pub customer_details: CustomerDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRefund {
    pub order_id: String,
    pub refund_amount: f64,
    /// Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_note: Option<String>,
}

/// A payment link that opens UPI apps directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpiPaymentLink {
    /// Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    pub amount: f64,
    pub purpose: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    /// ISO 8601 expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
    /// Ask Cashfree to SMS the link to the customer.
    #[serde(default)]
    pub notify_customer: bool,
}
