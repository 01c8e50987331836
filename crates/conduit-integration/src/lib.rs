// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared request engine for Conduit provider adapters.
//!
//! Provides the [`Integration`] trait, the [`IntegrationClient`] dispatch
//! pipeline, sliding-window rate limiting, opt-in retry, required-field
//! validation and webhook signature primitives.

pub mod client;
pub mod integration;
pub mod rate_limit;
pub mod request;
pub mod retry;
pub mod validation;
pub mod webhook;

pub use client::{IntegrationClient, IntegrationClientBuilder, classify_response};
pub use integration::Integration;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use request::{ApiRequest, encode_path_segment};
pub use retry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, retry_request, retry_with_defaults};
pub use validation::{digits_only, missing_required_fields, validate_required_fields};
pub use webhook::{
    WebhookBody, constant_time_compare, header_str, hmac_sha256, passthrough_event,
    verify_hmac_sha256_base64, verify_hmac_sha256_hex,
};
