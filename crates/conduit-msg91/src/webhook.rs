// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery-report normalization.
//!
//! MSG91 posts either one report object, an array of them, or a
//! `{"data": [...]}` wrapper. Per-number details may sit in a nested
//! `report` array.

use conduit_core::{WebhookEvent, WebhookEventType};
use conduit_integration::passthrough_event;
use serde_json::{Map, Value};

/// Normalizes a decoded delivery-report payload.
pub fn parse_delivery_report(payload: Value) -> WebhookEvent {
    let reports: Vec<Value> = report_objects(&payload)
        .into_iter()
        .map(|report| Value::Object(normalize(report)))
        .collect();

    let Some(Value::Object(first)) = reports.first().cloned() else {
        return passthrough_event(payload);
    };

    let mut event = WebhookEvent::new(WebhookEventType::DeliveryReport, payload);
    event.fields = first;
    event.with("reports", reports)
}

fn report_objects(payload: &Value) -> Vec<&Map<String, Value>> {
    let items: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![payload],
        },
        _ => Vec::new(),
    };
    items.into_iter().filter_map(Value::as_object).collect()
}

fn normalize(report: &Map<String, Value>) -> Map<String, Value> {
    let detail = report
        .get("report")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .and_then(Value::as_object);
    let pick = |keys: &[&str]| -> Value {
        keys.iter()
            .find_map(|k| detail.and_then(|d| d.get(*k)).or_else(|| report.get(*k)))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let mut out = Map::new();
    out.insert("request_id".into(), pick(&["requestId", "request_id"]));
    out.insert("status".into(), pick(&["status"]));
    out.insert("error_code".into(), pick(&["errorCode", "error_code"]));
    out.insert("number".into(), pick(&["number", "mobile"]));
    out.insert("description".into(), pick(&["description", "desc"]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_report_object() {
        let payload = json!({
            "requestId": "r-1",
            "status": "delivered",
            "number": "919876543210",
            "description": "Delivered"
        });
        let event = parse_delivery_report(payload.clone());
        assert_eq!(event.event_type, WebhookEventType::DeliveryReport);
        assert_eq!(event.str_field("request_id"), Some("r-1"));
        assert_eq!(event.str_field("status"), Some("delivered"));
        assert_eq!(event.field("error_code"), Some(&Value::Null));
        assert_eq!(event.raw_payload, payload);
    }

    #[test]
    fn data_wrapper_with_nested_report() {
        let payload = json!({
            "data": [{
                "requestId": "r-2",
                "senderId": "ACMEIN",
                "report": [{"number": "919000000001", "status": "2", "desc": "FAILED", "errorCode": "E12"}]
            }, {
                "requestId": "r-3",
                "report": [{"number": "919000000002", "status": "1", "desc": "DELIVERED"}]
            }]
        });
        let event = parse_delivery_report(payload);
        assert_eq!(event.str_field("request_id"), Some("r-2"));
        assert_eq!(event.str_field("number"), Some("919000000001"));
        assert_eq!(event.str_field("description"), Some("FAILED"));
        assert_eq!(event.str_field("error_code"), Some("E12"));
        assert_eq!(event.field("reports").and_then(Value::as_array).map(Vec::len), Some(2));
    }

    #[test]
    fn bare_array() {
        let payload = json!([{"request_id": "r-4", "status": "queued"}]);
        let event = parse_delivery_report(payload);
        assert_eq!(event.str_field("request_id"), Some("r-4"));
    }

    #[test]
    fn scalar_payload_is_unknown() {
        let event = parse_delivery_report(json!("ping"));
        assert_eq!(event.event_type, WebhookEventType::Unknown);
    }
}
