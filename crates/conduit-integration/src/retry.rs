// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opt-in retry with exponential backoff.
//!
//! `make_request` never retries on its own; callers wrap a call in
//! [`retry_request`] when repeating it is safe.

use std::future::Future;
use std::time::Duration;

use conduit_core::ConduitError;
use tracing::warn;

/// Attempts made by [`retry_with_defaults`].
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay used by [`retry_with_defaults`].
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Runs `operation` up to `max_retries` times.
///
/// After the n-th failed attempt (zero-based) the task sleeps
/// `delay * 2^n`. The last error is returned untouched. Errors that cannot
/// succeed on a second try are returned immediately. A `max_retries` of zero
/// still runs the operation once.
pub async fn retry_request<T, F, Fut>(
    mut operation: F,
    max_retries: u32,
    delay: Duration,
) -> Result<T, ConduitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConduitError>>,
{
    let attempts = max_retries.max(1);
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if attempt + 1 >= attempts {
                    return Err(e);
                }
                let backoff = delay.saturating_mul(2u32.saturating_pow(attempt));
                warn!(
                    attempt = attempt + 1,
                    max_retries = attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "request failed, backing off before retry"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

/// [`retry_request`] with three attempts and a one second base delay.
pub async fn retry_with_defaults<T, F, Fut>(operation: F) -> Result<T, ConduitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConduitError>>,
{
    retry_request(operation, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY).await
}
