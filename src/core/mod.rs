pub mod etl;
pub mod headers;
pub mod pipeline;
pub mod projector;
pub mod related;

pub use crate::domain::model::{ColumnKey, FieldPath, HeaderSet, PassStats, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Normalizer, Pipeline, RecordSource};
pub use crate::utils::error::Result;
