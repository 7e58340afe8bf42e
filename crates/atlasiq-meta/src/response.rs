//! Graph API envelope and lenient field extraction.
//!
//! Only the `{ "data": [...] }` envelope is decoded strictly. Individual
//! entries stay as `serde_json::Value` and are read field by field, so a
//! missing or wrongly typed optional field falls back to its default instead
//! of failing the whole page. An entry without a string `id` is dropped.

use atlasiq_core::GeoPoint;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One page of a Graph API collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphPage {
    pub(crate) data: Vec<Value>,
    #[serde(default)]
    pub(crate) paging: Option<Value>,
}

impl GraphPage {
    /// The `after` cursor, present only when the API advertises a next page.
    pub(crate) fn next_cursor(&self) -> Option<String> {
        let paging = self.paging.as_ref()?;
        paging.get("next").and_then(Value::as_str)?;
        paging
            .pointer("/cursors/after")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
    }
}

/// Extracts the Graph error message from a non-2xx body, if any.
pub(crate) fn graph_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

pub(crate) fn id_field(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub(crate) fn str_field(item: &Value, pointer: &str) -> Option<String> {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Non-negative counter; numbers, numeric strings, or 0.
pub(crate) fn count_field(item: &Value, pointer: &str) -> u64 {
    match item.pointer(pointer) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Reads `{ latitude, longitude }` under `pointer`; invalid pairs are `None`.
pub(crate) fn geo_field(item: &Value, pointer: &str) -> Option<GeoPoint> {
    let node = item.pointer(pointer)?;
    let latitude = node.get("latitude").and_then(Value::as_f64)?;
    let longitude = node.get("longitude").and_then(Value::as_f64)?;
    GeoPoint::new(latitude, longitude).ok()
}

/// Graph timestamps look like `2025-09-19T14:03:11+0000`; RFC 3339 is also
/// accepted.
pub(crate) fn time_field(item: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    let raw = item.pointer(pointer).and_then(Value::as_str)?;
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
