use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Field paths used when none are configured.
pub const DEFAULT_FIELDS: [&str; 7] = [
    "referenced_tweets.author.username",
    "referenced_tweets.type",
    "author_id",
    "created_at",
    "id",
    "source",
    "text",
];

/// A dotted field selection such as `referenced_tweets.author.username`.
///
/// Always holds at least one segment and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EtlError::InvalidFieldPathError {
                path: raw.to_string(),
                reason: "field path cannot be empty".to_string(),
            });
        }

        let segments: Vec<String> = trimmed.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(EtlError::InvalidFieldPathError {
                path: raw.to_string(),
                reason: "field path contains an empty segment".to_string(),
            });
        }

        Ok(Self { segments })
    }

    /// Parses a whole field list, failing on the first invalid entry.
    pub fn parse_all<I, S>(raw: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_FIELDS
            .iter()
            .map(|s| Self {
                segments: s.split('.').map(str::to_string).collect(),
            })
            .collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment; the header resolver searches for keys with this name.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl FromStr for FieldPath {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Concrete location of one CSV column inside a projected record, with
/// array indices as numeric segments (`referenced_tweets.0.type`).
///
/// Ordering is the plain lexicographic order of the dotted string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnKey(String);

impl ColumnKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        Self(parts.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// CSV needs a header pass before rows can be written.
    pub fn needs_two_passes(self) -> bool {
        matches!(self, OutputFormat::Csv)
    }
}

/// How a present-but-null value is written into a CSV cell. Absent paths
/// are always written as an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum NullRendering {
    #[default]
    Empty,
    #[cfg_attr(feature = "cli", value(name = "none"))]
    #[serde(rename = "none")]
    NoneText,
}

impl NullRendering {
    pub fn as_str(self) -> &'static str {
        match self {
            NullRendering::Empty => "",
            NullRendering::NoneText => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Any whitespace separated sequence of JSON values.
    #[default]
    Stream,
    /// Exactly one JSON value per non-blank line.
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Log the conflict and keep the first-seen value.
    #[default]
    Warn,
    /// Abort the run on the first conflict.
    Fail,
}

/// Stream-wide accumulator of discovered CSV columns. Filled during the
/// header pass and finalized into the fixed column order for the row pass.
#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    columns: BTreeSet<ColumnKey>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = ColumnKey>,
    {
        self.columns.extend(keys);
    }

    pub fn contains(&self, key: &ColumnKey) -> bool {
        self.columns.contains(key)
    }

    /// Sorted, duplicate free column list.
    pub fn finalize(self) -> Vec<ColumnKey> {
        self.columns.into_iter().collect()
    }
}

/// Counters for a single traversal of the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub records_read: usize,
    pub records_emitted: usize,
    pub records_filtered: usize,
    pub lines_skipped: usize,
    pub conflicts: usize,
}

/// Totals reported at the end of a run, taken from the emitting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_emitted: usize,
    pub records_filtered: usize,
    pub lines_skipped: usize,
    pub conflicts: usize,
    pub columns: Vec<ColumnKey>,
}

impl RunSummary {
    pub fn from_pass(stats: PassStats, columns: Vec<ColumnKey>) -> Self {
        Self {
            records_read: stats.records_read,
            records_emitted: stats.records_emitted,
            records_filtered: stats.records_filtered,
            lines_skipped: stats.lines_skipped,
            conflicts: stats.conflicts,
            columns,
        }
    }
}
