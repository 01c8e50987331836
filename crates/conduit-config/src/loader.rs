// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./conduit.toml` > `~/.config/conduit/conduit.toml` > `/etc/conduit/conduit.toml`
//! with environment variable overrides via `CONDUIT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ConduitConfig;

/// Section names recognized in `CONDUIT_<PROVIDER>_<KEY>` variables.
const PROVIDER_KEYS: [&str; 5] = ["msg91", "telegram", "whatsapp", "shiprocket", "cashfree"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/conduit/conduit.toml` (system-wide)
/// 3. `~/.config/conduit/conduit.toml` (user XDG config)
/// 4. `./conduit.toml` (local directory)
/// 5. `CONDUIT_*` environment variables
pub fn load_config() -> Result<ConduitConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ConduitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConduitConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConduitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConduitConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ConduitConfig::default()))
        .merge(Toml::file("/etc/conduit/conduit.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("conduit/conduit.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("conduit.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit key mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: credential keys contain
/// underscores, so `CONDUIT_MSG91_AUTH_KEY` must become
/// `providers.msg91.credentials.auth_key`.
fn env_provider() -> Env {
    Env::prefixed("CONDUIT_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a config path.
pub(crate) fn map_env_key(key: &str) -> String {
    if let Some(rest) = key.strip_prefix("log_") {
        return format!("log.{rest}");
    }
    if let Some(rest) = key.strip_prefix("http_") {
        return format!("http.{rest}");
    }
    for provider in PROVIDER_KEYS {
        if let Some(rest) = key
            .strip_prefix(provider)
            .and_then(|r| r.strip_prefix('_'))
        {
            return match rest {
                "base_url" | "webhook_secret" => format!("providers.{provider}.{rest}"),
                _ => format!("providers.{provider}.credentials.{rest}"),
            };
        }
    }
    key.to_string()
}
