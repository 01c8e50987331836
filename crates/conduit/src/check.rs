// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `conduit check` command implementation.
//!
//! Builds one adapter from the loaded configuration and runs its
//! connection probe with the configured credentials.

use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, ConnectionTest, Provider};
use conduit_integration::Integration;
use tracing::{info, warn};

use crate::adapters::with_adapter;

/// Probes `provider` with the credentials from `config`.
///
/// A provider without credentials is reported as a failed check.
pub async fn run_check(
    config: &ConduitConfig,
    provider: Provider,
) -> Result<ConnectionTest, ConduitError> {
    Ok(with_adapter!(provider, config, adapter => probe_adapter(&adapter).await))
}

async fn probe_adapter<I: Integration>(adapter: &I) -> ConnectionTest {
    let provider = adapter.provider();
    let outcome = match adapter.ensure_initialized() {
        Ok(()) => adapter.probe().await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(details) => {
            info!(provider = %provider, "provider check passed");
            ConnectionTest::connected(provider, details)
        }
        Err(e) => {
            warn!(provider = %provider, kind = %e.kind(), "provider check failed");
            ConnectionTest::failed(provider, &e)
        }
    }
}
