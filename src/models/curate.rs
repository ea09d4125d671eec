// List curation: sort raw upstream entries by a dotted key path.

use serde_json::Value;
use std::cmp::Ordering;

/// Resolve a dotted path such as `stats.kills.value` to a number.
///
/// Any miss along the path, or a non-numeric leaf, reads as 0. Numeric
/// strings count as numbers.
pub fn nested_number(item: &Value, path: &str) -> f64 {
    let mut current = item;
    for key in path.split('.') {
        match current.get(key) {
            Some(next) => current = next,
            None => return 0.0,
        }
    }
    match current {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Sort descending by `path`, keeping every entry. Ties keep upstream order.
pub fn sort_by_path_desc(mut items: Vec<Value>, path: &str) -> Vec<Value> {
    items.sort_by(|a, b| {
        nested_number(b, path)
            .partial_cmp(&nested_number(a, path))
            .unwrap_or(Ordering::Equal)
    });
    items
}

/// Drop entries whose key is zero, then sort the rest descending.
pub fn curate_by_path(items: Vec<Value>, path: &str) -> Vec<Value> {
    let kept = items
        .into_iter()
        .filter(|item| nested_number(item, path) != 0.0)
        .collect();
    sort_by_path_desc(kept, path)
}

/// Split a bf6 profile's segments by their `type` tag.
#[derive(Debug, Default)]
pub struct SegmentsByKind {
    pub weapons: Vec<Value>,
    pub vehicles: Vec<Value>,
    pub kits: Vec<Value>,
}

pub fn split_segments(segments: &[Value]) -> SegmentsByKind {
    let mut out = SegmentsByKind::default();
    for segment in segments {
        match segment.get("type").and_then(Value::as_str) {
            Some("weapon") => out.weapons.push(segment.clone()),
            Some("vehicle") => out.vehicles.push(segment.clone()),
            Some("kit") => out.kits.push(segment.clone()),
            _ => {}
        }
    }
    out
}

/// Accept a list endpoint's body as either a bare array or an object
/// wrapping the array under `data` or `segments`.
pub fn into_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => ["data", "segments"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
