// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `conduit webhook` command implementation.
//!
//! Replays a saved webhook body through an adapter: `parse` prints the
//! normalized event, `verify` checks a signature against the configured
//! secret.

use conduit_cashfree::signed_payload;
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Provider, WebhookEvent};
use conduit_integration::{Integration, WebhookBody};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::adapters::with_adapter;

pub fn parse_webhook(
    config: &ConduitConfig,
    provider: Provider,
    body: &[u8],
) -> Result<WebhookEvent, ConduitError> {
    let headers = HeaderMap::new();
    with_adapter!(provider, config, adapter => {
        adapter.parse_webhook_payload(WebhookBody::Raw(body), &headers)
    })
}

/// Options for [`verify_webhook`].
#[derive(Debug, Default)]
pub struct VerifyOptions<'a> {
    /// Overrides the section's `webhook_secret`.
    pub secret: Option<&'a str>,
    /// Cashfree signing timestamp; defaults to the payload's `event_time`.
    pub timestamp: Option<&'a str>,
}

pub fn verify_webhook(
    config: &ConduitConfig,
    provider: Provider,
    body: &[u8],
    signature: &str,
    options: &VerifyOptions<'_>,
) -> Result<bool, ConduitError> {
    let secret = options
        .secret
        .map(str::to_string)
        .or_else(|| {
            config
                .providers
                .get(provider)
                .and_then(|section| section.webhook_secret.clone())
        })
        .ok_or_else(|| {
            ConduitError::Config(format!(
                "no webhook_secret configured for {provider}, pass --secret"
            ))
        })?;
    let signed = signed_bytes(provider, body, options.timestamp)?;
    with_adapter!(provider, config, adapter => {
        adapter.verify_webhook_signature(&signed, signature, &secret)
    })
}

/// Cashfree signs `order_id + order_amount + timestamp` rather than the
/// body, so that string is rebuilt from the payload.
fn signed_bytes(
    provider: Provider,
    body: &[u8],
    timestamp: Option<&str>,
) -> Result<Vec<u8>, ConduitError> {
    if provider != Provider::Cashfree {
        return Ok(body.to_vec());
    }
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| ConduitError::InvalidWebhookPayload {
            message: e.to_string(),
        })?;
    let order = &payload["data"]["order"];
    let order_id = order["order_id"]
        .as_str()
        .ok_or_else(|| ConduitError::missing_fields(["data.order.order_id"]))?;
    let amount = order["order_amount"]
        .as_f64()
        .ok_or_else(|| ConduitError::missing_fields(["data.order.order_amount"]))?;
    let timestamp = timestamp
        .or_else(|| payload["event_time"].as_str())
        .ok_or_else(|| ConduitError::missing_fields(["timestamp"]))?;
    Ok(signed_payload(order_id, amount, timestamp).into_bytes())
}
