// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Required-field checks run before any request is built.

use conduit_core::ConduitError;
use serde::Serialize;
use serde_json::Value;

/// Fails with every required field that is missing or empty.
///
/// A field counts as missing when it is absent, `null`, `false`, zero, a
/// blank string, or an empty array or object. Fields are reported in the
/// order given.
pub fn validate_required_fields<T: Serialize + ?Sized>(
    data: &T,
    required: &[&str],
) -> Result<(), ConduitError> {
    let missing = missing_required_fields(data, required)?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConduitError::missing_fields(missing))
    }
}

/// Names of the required fields that are missing, without failing.
///
/// Used where one input has several levels (an order and its addresses) and
/// all of them must be reported together.
pub fn missing_required_fields<T: Serialize + ?Sized>(
    data: &T,
    required: &[&str],
) -> Result<Vec<String>, ConduitError> {
    let value = serde_json::to_value(data).map_err(|e| ConduitError::Decode {
        message: format!("failed to inspect request fields: {e}"),
    })?;

    Ok(required
        .iter()
        .filter(|field| value.get(**field).is_none_or(is_empty))
        .map(|field| (*field).to_string())
        .collect())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Keeps ASCII digits only, so `+91 98765-43210` becomes `919876543210`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
