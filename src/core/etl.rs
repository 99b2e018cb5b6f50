use crate::core::{Pipeline, RunSummary};
use crate::domain::model::OutputFormat;
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;
use std::io::Write;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    format: OutputFormat,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, format: OutputFormat) -> Self {
        Self::new_with_monitoring(pipeline, format, false)
    }

    pub fn new_with_monitoring(pipeline: P, format: OutputFormat, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            format,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn run(&self, out: &mut dyn Write) -> Result<RunSummary> {
        let summary = match self.format {
            OutputFormat::Json => self.run_json(out)?,
            OutputFormat::Csv => self.run_csv(out)?,
        };

        tracing::info!(
            "✅ Emitted {} of {} records ({} filtered out, {} malformed lines skipped, {} conflicts)",
            summary.records_emitted,
            summary.records_read,
            summary.records_filtered,
            summary.lines_skipped,
            summary.conflicts
        );
        self.monitor.log_final_stats();

        Ok(summary)
    }

    fn run_json(&self, out: &mut dyn Write) -> Result<RunSummary> {
        tracing::info!("📝 Writing JSON lines");
        let stats = self.pipeline.write_json(out)?;
        self.monitor.log_stats("JSON pass");

        Ok(RunSummary::from_pass(stats, Vec::new()))
    }

    fn run_csv(&self, out: &mut dyn Write) -> Result<RunSummary> {
        if !self.pipeline.supports_two_passes() {
            return Err(EtlError::ProcessingError {
                message: "CSV output needs an input that can be read twice".to_string(),
            });
        }

        // 第一輪：收集欄位
        tracing::info!("🔍 Pass 1/2: discovering CSV columns");
        let (headers, discovery) = self.pipeline.discover_headers()?;
        let columns = headers.finalize();
        tracing::info!(
            "🔍 Found {} columns across {} records",
            columns.len(),
            discovery.records_emitted
        );
        self.monitor.log_stats("Header pass");

        // 第二輪：輸出資料列
        tracing::info!("📝 Pass 2/2: writing CSV rows");
        let stats = self.pipeline.write_csv(&columns, out)?;
        if stats.records_emitted != discovery.records_emitted {
            tracing::warn!(
                "⚠️ Row pass emitted {} records but header pass saw {}; did the input change?",
                stats.records_emitted,
                discovery.records_emitted
            );
        }
        self.monitor.log_stats("Row pass");

        Ok(RunSummary::from_pass(stats, columns))
    }
}
