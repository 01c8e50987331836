// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known log levels, positive limits and absolute provider URLs.

use crate::diagnostic::ConfigError;
use crate::model::ConduitConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConduitConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.http.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "http.timeout_secs must be greater than 0".to_string(),
        });
    }

    for (provider, section) in config.providers.iter() {
        if let Some(url) = &section.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            errors.push(ConfigError::Validation {
                message: format!(
                    "providers.{provider}.base_url `{url}` must start with http:// or https://"
                ),
            });
        }

        if let Some(limit) = section.rate_limit {
            if limit.max_requests == 0 {
                errors.push(ConfigError::Validation {
                    message: format!("providers.{provider}.rate_limit.max_requests must be at least 1"),
                });
            }
            if limit.window_ms == 0 {
                errors.push(ConfigError::Validation {
                    message: format!("providers.{provider}.rate_limit.window_ms must be at least 1"),
                });
            }
        }

        if section
            .webhook_secret
            .as_ref()
            .is_some_and(|s| s.trim().is_empty())
        {
            errors.push(ConfigError::Validation {
                message: format!("providers.{provider}.webhook_secret must not be empty"),
            });
        }

        for key in section.credentials.keys() {
            if section
                .credentials
                .get(key)
                .is_some_and(|v| v.trim().is_empty())
            {
                errors.push(ConfigError::Validation {
                    message: format!("providers.{provider}.credentials.{key} must not be empty"),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
