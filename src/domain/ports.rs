use crate::domain::model::{
    ColumnKey, ConflictPolicy, FieldPath, HeaderSet, InputMode, MalformedPolicy, NullRendering,
    OutputFormat, PassStats,
};
use crate::utils::error::Result;
use serde_json::Value;
use std::io::{BufRead, Write};

/// Input that can be traversed from the start, once per `open` call.
pub trait RecordSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>>;
    fn describe(&self) -> String;
    /// Whether `open` may be called more than once.
    fn is_rewindable(&self) -> bool;
}

/// Upstream normalization (the "flatten" step): one parsed input value in,
/// zero or more tweet records out.
pub trait Normalizer {
    fn normalize(&self, raw: Value) -> Vec<Value>;
}

pub trait ConfigProvider {
    fn field_paths(&self) -> &[FieldPath];
    fn output_format(&self) -> OutputFormat;
    fn related(&self) -> Option<&str>;
    fn null_rendering(&self) -> NullRendering;
    fn input_mode(&self) -> InputMode;
    fn malformed_policy(&self) -> MalformedPolicy;
    fn conflict_policy(&self) -> ConflictPolicy;
    fn split_arrays(&self) -> bool;
}

pub trait Pipeline {
    fn supports_two_passes(&self) -> bool;
    fn discover_headers(&self) -> Result<(HeaderSet, PassStats)>;
    fn write_json(&self, out: &mut dyn Write) -> Result<PassStats>;
    fn write_csv(&self, columns: &[ColumnKey], out: &mut dyn Write) -> Result<PassStats>;
}
