// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window rate limiting for outbound provider calls.
//!
//! The window is local to one adapter instance. `check` and `track` are
//! separate steps: two concurrent callers may both pass `check` before either
//! records its attempt, so short bursts can exceed the limit. This is a
//! client-side courtesy limiter, not a server-enforced guarantee.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use conduit_core::{ConduitError, DEFAULT_WINDOW_MS, Provider, RateLimitSource};
use tokio::time::Instant;
use tracing::warn;

/// Capacity of a sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum attempts inside one window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_millis(window_ms),
        }
    }

    /// `max_requests` per minute.
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, DEFAULT_WINDOW_MS)
    }

    /// The provider's documented default.
    pub fn for_provider(provider: Provider) -> Self {
        Self::per_minute(provider.default_max_requests())
    }
}

/// Timestamps of recent attempts for one adapter instance.
#[derive(Debug)]
pub struct RateLimiter {
    provider: Provider,
    config: RateLimitConfig,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(provider: Provider, config: RateLimitConfig) -> Self {
        Self {
            provider,
            config,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Purges expired attempts, then refuses when the window is full.
    pub fn check(&self) -> Result<(), ConduitError> {
        let now = Instant::now();
        let mut requests = self.lock();
        purge(&mut requests, now, self.config.window);

        if requests.len() >= self.config.max_requests as usize {
            let retry_after = requests
                .front()
                .map(|oldest| (*oldest + self.config.window).saturating_duration_since(now));
            warn!(
                provider = %self.provider,
                max_requests = self.config.max_requests,
                window_ms = self.config.window.as_millis() as u64,
                "local rate limit reached, refusing request"
            );
            return Err(ConduitError::RateLimited {
                provider: self.provider,
                origin: RateLimitSource::Local,
                retry_after,
            });
        }

        Ok(())
    }

    /// Records one attempt at the current instant.
    pub fn track(&self) {
        self.lock().push_back(Instant::now());
    }

    /// Attempts still inside the window.
    pub fn in_window(&self) -> usize {
        let mut requests = self.lock();
        purge(&mut requests, Instant::now(), self.config.window);
        requests.len()
    }

    /// Attempts left before the window is full.
    pub fn remaining(&self) -> u32 {
        (self.config.max_requests as usize).saturating_sub(self.in_window()) as u32
    }

    /// Forgets every recorded attempt.
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drops every timestamp older than `window`; the boundary itself is kept.
fn purge(requests: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = requests.front() {
        if now.saturating_duration_since(*oldest) > window {
            requests.pop_front();
        } else {
            break;
        }
    }
}
