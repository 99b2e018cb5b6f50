//! CSV column discovery and per-cell lookup on projected records.

use crate::domain::model::{ColumnKey, FieldPath, NullRendering};
use serde_json::Value;
use std::collections::BTreeSet;

/// Finds every occurrence, at any depth, of a key named like the leaf
/// segment of one of `paths`. Array positions become numeric segments.
pub fn resolve_headers(projected: &Value, paths: &[FieldPath]) -> BTreeSet<ColumnKey> {
    let leaves: BTreeSet<&str> = paths.iter().map(FieldPath::leaf).collect();
    let mut found = BTreeSet::new();
    let mut trail = Vec::new();

    collect_matches(projected, &leaves, &mut trail, &mut found);
    found
}

fn collect_matches(
    value: &Value,
    leaves: &BTreeSet<&str>,
    trail: &mut Vec<String>,
    found: &mut BTreeSet<ColumnKey>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                trail.push(key.clone());
                if leaves.contains(key.as_str()) {
                    found.insert(ColumnKey::from_segments(trail.as_slice()));
                }
                collect_matches(child, leaves, trail, found);
                trail.pop();
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                trail.push(index.to_string());
                collect_matches(item, leaves, trail, found);
                trail.pop();
            }
        }
        _ => {}
    }
}

/// Follows `column` through objects and arrays. `None` means some segment
/// is absent from this record.
pub fn lookup<'v>(projected: &'v Value, column: &ColumnKey) -> Option<&'v Value> {
    column
        .segments()
        .try_fold(projected, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

pub fn render_cell(value: Option<&Value>, nulls: NullRendering) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => nulls.as_str().to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn row_for(projected: &Value, columns: &[ColumnKey], nulls: NullRendering) -> Vec<String> {
    columns
        .iter()
        .map(|column| render_cell(lookup(projected, column), nulls))
        .collect()
}
