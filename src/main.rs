use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use twarc_filter::utils::error::ErrorSeverity;
use twarc_filter::utils::{logger, validation::Validate};
use twarc_filter::core::ConfigProvider;
use twarc_filter::{CliConfig, EtlEngine, EtlError, FilterPipeline};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ twarc-filter failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting twarc-filter");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    let settings = match config
        .validate()
        .and_then(|_| config.resolve())
        .and_then(|settings| settings.validate().map(|_| settings))
    {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    for literal in settings.shadowed_literals() {
        tracing::warn!(
            "⚠️ Field '{}' is shadowed by dotted paths below it and will not be copied whole",
            literal
        );
    }
    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let format = settings.output_format();
    let source = match config.input_source(format) {
        Ok(source) => source,
        Err(e) => exit_with(&e),
    };

    let mut out: Box<dyn Write> = match &config.outfile {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let pipeline = FilterPipeline::new(source, settings);
    let engine = EtlEngine::new_with_monitoring(pipeline, format, config.monitor);

    match engine.run(&mut *out) {
        Ok(summary) => {
            out.flush().context("failed to flush output")?;
            if let Some(path) = &config.outfile {
                tracing::info!("📁 Output saved to: {}", path.display());
            }
            if !summary.columns.is_empty() {
                tracing::debug!("CSV columns: {:?}", summary.columns);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
