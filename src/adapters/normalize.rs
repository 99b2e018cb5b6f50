use crate::core::Normalizer;
use serde_json::Value;

/// Each input value is one record, arrays included.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Normalizer for PassThrough {
    fn normalize(&self, raw: Value) -> Vec<Value> {
        vec![raw]
    }
}

/// A top-level array becomes one record per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitArrays;

impl Normalizer for SplitArrays {
    fn normalize(&self, raw: Value) -> Vec<Value> {
        match raw {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}
