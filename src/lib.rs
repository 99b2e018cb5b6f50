pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{settings::RunSettings, toml_config::TomlConfig};
pub use crate::core::{
    etl::EtlEngine,
    headers::{lookup, resolve_headers},
    pipeline::FilterPipeline,
    projector::{project, Projection, ProjectionConflict, Projector},
    related::{is_related, RelatedFilter},
};
pub use domain::model::{ColumnKey, FieldPath, HeaderSet, OutputFormat, RunSummary, DEFAULT_FIELDS};
pub use utils::error::{EtlError, Result};
