//! Logging configuration for askrag

use std::path::Path;

use opentelemetry_sdk::trace::Tracer;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

/// Filter from `RUST_LOG`, falling back to the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},askrag={level}")))
}

/// Initialize logging: console output, optional daily-rolling file output,
/// and the OpenTelemetry bridge when a tracer is supplied.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_logging(config: &LoggingConfig, tracer: Option<Tracer>) -> Result<Option<WorkerGuard>> {
    // Set up file appender when enabled
    let (file_writer, guard) = if config.file_output {
        let logs_dir = Path::new(&config.log_dir);
        if !logs_dir.exists() {
            std::fs::create_dir_all(logs_dir)?;
        }
        let file_appender = tracing_appender::rolling::daily(logs_dir, "askrag.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        (Some(non_blocking), Some(guard))
    } else {
        (None, None)
    };

    // Console layer
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    // File layer, no colors
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .with_ansi(false)
    });

    let telemetry_enabled = tracer.is_some();

    Registry::default()
        .with(env_filter(&config.level))
        .with(console_layer)
        .with(file_layer)
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()
        .map_err(|e| crate::AskRagError::Config(format!("logging already initialized: {e}")))?;

    tracing::info!(
        "Logging initialized with level: {} (file output: {}, telemetry: {})",
        config.level,
        config.file_output,
        telemetry_enabled
    );
    if config.file_output {
        tracing::info!(
            "Log files will be saved to: {}/askrag.log.YYYY-MM-DD",
            config.log_dir
        );
    }

    Ok(guard)
}

/// Initialize simple console logging for one-shot commands and tests
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| crate::AskRagError::Config(format!("logging already initialized: {e}")))?;

    Ok(())
}
