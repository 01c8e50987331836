// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MSG91 credentials and request inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transactional SMS route.
pub const DEFAULT_ROUTE: &str = "4";

/// Country code prepended by MSG91 to local numbers.
pub const DEFAULT_COUNTRY: &str = "91";

#[derive(Clone, Deserialize)]
pub struct Msg91Credentials {
    pub auth_key: String,
    /// Default DLT sender id for SMS.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Integrated WhatsApp number used for outbound WhatsApp messages.
    #[serde(default)]
    pub whatsapp_number: Option<String>,
}

impl fmt::Debug for Msg91Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Msg91Credentials")
            .field("auth_key", &"[REDACTED]")
            .field("sender_id", &self.sender_id)
            .field("whatsapp_number", &self.whatsapp_number)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendSms {
    pub to: String,
    pub message: String,
    /// Overrides the credential's sender id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOtp {
    pub mobile: String,
    pub template_id: String,
    /// Caller-chosen OTP; MSG91 generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_length: Option<u8>,
    /// Expiry in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_expiry: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyOtp {
    pub mobile: String,
    pub otp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResendOtp {
    pub mobile: String,
    /// `text` or `voice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppTemplate {
    pub to: String,
    pub template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Template variables keyed as MSG91 expects (`body_1`, `header_1`...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppMedia {
    pub to: String,
    /// `image`, `video`, `audio` or `document`.
    pub media_type: String,
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}
