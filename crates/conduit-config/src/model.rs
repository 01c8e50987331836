// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Conduit.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use conduit_core::{CredentialBag, DEFAULT_WINDOW_MS, Provider};
use serde::{Deserialize, Serialize};

/// Top-level Conduit configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConduitConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-provider sections.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP client configuration shared by every adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` sent to providers.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("conduit/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Provider sections. A missing section means the provider is not configured.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub msg91: Option<ProviderConfig>,
    #[serde(default)]
    pub telegram: Option<ProviderConfig>,
    #[serde(default)]
    pub whatsapp: Option<ProviderConfig>,
    #[serde(default)]
    pub shiprocket: Option<ProviderConfig>,
    #[serde(default)]
    pub cashfree: Option<ProviderConfig>,
}

impl ProvidersConfig {
    /// Returns the section for `provider`, if configured.
    pub fn get(&self, provider: Provider) -> Option<&ProviderConfig> {
        match provider {
            Provider::Msg91 => self.msg91.as_ref(),
            Provider::Telegram => self.telegram.as_ref(),
            Provider::WhatsApp => self.whatsapp.as_ref(),
            Provider::Shiprocket => self.shiprocket.as_ref(),
            Provider::Cashfree => self.cashfree.as_ref(),
        }
    }

    /// Iterates configured providers in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Provider, &ProviderConfig)> {
        [
            Provider::Msg91,
            Provider::Telegram,
            Provider::WhatsApp,
            Provider::Shiprocket,
            Provider::Cashfree,
        ]
        .into_iter()
        .filter_map(|p| self.get(p).map(|cfg| (p, cfg)))
    }
}

/// Settings for one provider adapter.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Overrides the adapter's built-in base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Overrides the provider's default rate limit.
    #[serde(default)]
    pub rate_limit: Option<RateLimitSettings>,

    /// Secret used to verify inbound webhooks.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Opaque credential bag handed to the adapter's `initialize`.
    #[serde(default)]
    pub credentials: CredentialBag,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Sliding-window override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}
