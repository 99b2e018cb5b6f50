use crate::adapters::normalize::{PassThrough, SplitArrays};
use crate::adapters::reader::RecordReader;
use crate::core::headers::{resolve_headers, row_for};
use crate::core::projector::{Projection, Projector};
use crate::core::related::RelatedFilter;
use crate::core::{
    ColumnKey, ConfigProvider, HeaderSet, Normalizer, PassStats, Pipeline, RecordSource, Result,
};
use crate::domain::model::ConflictPolicy;
use serde_json::Value;
use std::io::Write;

/// Read → normalize → filter → project, as one traversal of the source.
pub struct FilterPipeline<S: RecordSource, C: ConfigProvider> {
    source: S,
    config: C,
    projector: Projector,
    filter: RelatedFilter,
    normalizer: Box<dyn Normalizer>,
}

impl<S: RecordSource, C: ConfigProvider> FilterPipeline<S, C> {
    pub fn new(source: S, config: C) -> Self {
        let projector = Projector::new(config.field_paths().to_vec());
        let filter = RelatedFilter::new(config.related().map(str::to_string));
        let normalizer: Box<dyn Normalizer> = if config.split_arrays() {
            Box::new(SplitArrays)
        } else {
            Box::new(PassThrough)
        };

        Self {
            source,
            config,
            projector,
            filter,
            normalizer,
        }
    }

    fn traverse<F>(&self, pass: &str, mut visit: F) -> Result<PassStats>
    where
        F: FnMut(&Value) -> Result<()>,
    {
        tracing::debug!("{}: reading {}", pass, self.source.describe());

        let input = self.source.open()?;
        let mut reader = RecordReader::new(
            input,
            self.config.input_mode(),
            self.config.malformed_policy(),
        );
        let mut stats = PassStats::default();

        for raw in reader.by_ref() {
            for record in self.normalizer.normalize(raw?) {
                stats.records_read += 1;

                if !self.filter.accepts(&record) {
                    stats.records_filtered += 1;
                    tracing::debug!(
                        "{}: record {} has no '{}' reference, skipped",
                        pass,
                        stats.records_read,
                        self.filter.relation().unwrap_or_default()
                    );
                    continue;
                }

                let Projection { value, conflicts } = self.projector.project(&record);
                if !conflicts.is_empty() {
                    if self.config.conflict_policy() == ConflictPolicy::Fail {
                        if let Some(conflict) = conflicts.into_iter().next() {
                            return Err(conflict.into());
                        }
                    } else {
                        for conflict in &conflicts {
                            tracing::warn!("⚠️ {}: record {}: {}", pass, stats.records_read, conflict);
                        }
                        stats.conflicts += conflicts.len();
                    }
                }

                visit(&value)?;
                stats.records_emitted += 1;
            }
        }

        stats.lines_skipped = reader.skipped();
        tracing::debug!("{}: {:?}", pass, stats);
        Ok(stats)
    }
}

impl<S: RecordSource, C: ConfigProvider> Pipeline for FilterPipeline<S, C> {
    fn supports_two_passes(&self) -> bool {
        self.source.is_rewindable()
    }

    fn discover_headers(&self) -> Result<(HeaderSet, PassStats)> {
        let mut headers = HeaderSet::new();
        let paths = self.projector.paths();

        let stats = self.traverse("header pass", |projected| {
            headers.add(resolve_headers(projected, paths));
            Ok(())
        })?;

        Ok((headers, stats))
    }

    fn write_json(&self, out: &mut dyn Write) -> Result<PassStats> {
        let stats = self.traverse("json pass", |projected| {
            serde_json::to_writer(&mut *out, projected)?;
            out.write_all(b"\n")?;
            Ok(())
        })?;

        out.flush()?;
        Ok(stats)
    }

    fn write_csv(&self, columns: &[ColumnKey], out: &mut dyn Write) -> Result<PassStats> {
        let nulls = self.config.null_rendering();

        // csv 無法寫出零欄位的紀錄，直接輸出空行
        if columns.is_empty() {
            tracing::warn!("⚠️ No CSV columns were discovered, writing empty rows");
            out.write_all(b"\n")?;
            let stats = self.traverse("row pass", |_| {
                out.write_all(b"\n")?;
                Ok(())
            })?;
            out.flush()?;
            return Ok(stats);
        }

        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(columns.iter().map(ColumnKey::as_str))?;

        let stats = self.traverse("row pass", |projected| {
            writer.write_record(row_for(projected, columns, nulls))?;
            Ok(())
        })?;

        writer.flush()?;
        Ok(stats)
    }
}
