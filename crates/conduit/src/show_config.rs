// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `conduit config` command implementation.

use conduit_config::{ConduitConfig, ProviderConfig};
use conduit_core::{ConduitError, CredentialBag};

const REDACTED: &str = "[REDACTED]";

/// Renders the effective configuration as TOML with every credential value
/// and webhook secret masked. Credential keys stay visible.
pub fn render_config(config: &ConduitConfig) -> Result<String, ConduitError> {
    let mut config = config.clone();
    let providers = &mut config.providers;
    for section in [
        &mut providers.msg91,
        &mut providers.telegram,
        &mut providers.whatsapp,
        &mut providers.shiprocket,
        &mut providers.cashfree,
    ]
    .into_iter()
    .flatten()
    {
        redact(section);
    }
    toml::to_string_pretty(&config)
        .map_err(|e| ConduitError::Config(format!("failed to render configuration: {e}")))
}

fn redact(section: &mut ProviderConfig) {
    if section.webhook_secret.is_some() {
        section.webhook_secret = Some(REDACTED.to_string());
    }
    section.credentials = section
        .credentials
        .keys()
        .map(|key| (key.to_string(), REDACTED))
        .collect::<CredentialBag>();
}
