// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reply_markup` builders.

use serde::Serialize;
use serde_json::{Value, json};

/// A button under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineButton {
    /// Sends `data` back as a `callback_query` when pressed.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// A button on the custom reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_location: bool,
}

impl KeyboardButton {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: false,
            request_location: false,
        }
    }

    /// Shares the user's phone number when pressed.
    pub fn request_contact(text: impl Into<String>) -> Self {
        Self {
            request_contact: true,
            ..Self::text(text)
        }
    }

    pub fn request_location(text: impl Into<String>) -> Self {
        Self {
            request_location: true,
            ..Self::text(text)
        }
    }
}

pub fn inline_keyboard(rows: Vec<Vec<InlineButton>>) -> Value {
    json!({ "inline_keyboard": rows })
}

pub fn reply_keyboard(rows: Vec<Vec<KeyboardButton>>, resize: bool, one_time: bool) -> Value {
    json!({
        "keyboard": rows,
        "resize_keyboard": resize,
        "one_time_keyboard": one_time,
    })
}

pub fn remove_keyboard() -> Value {
    json!({ "remove_keyboard": true })
}
