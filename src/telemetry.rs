//! Trace export to an OpenTelemetry collector
//!
//! Spans recorded through `tracing` are bridged into an OpenTelemetry tracer
//! provider that ships them over OTLP/HTTP and, optionally, mirrors them to
//! stdout. OTLP export runs on a background batch processor, so a slow or
//! dead collector never holds up a request.

use std::time::Duration;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use tracing::warn;

use crate::config::TelemetryConfig;
use crate::errors::AskRagError;
use crate::errors::Result;

/// OTLP/HTTP path for trace export
const TRACES_PATH: &str = "/v1/traces";

/// Upper bound on a single export attempt
const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Full trace export URL for a collector base address
#[must_use]
pub fn traces_endpoint(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(TRACES_PATH) {
        base.to_string()
    } else {
        format!("{base}{TRACES_PATH}")
    }
}

/// Owns the tracer provider; flushes and shuts it down on `shutdown` or drop
pub struct TelemetryGuard {
    provider: TracerProvider,
    tracer: Tracer,
    endpoint: String,
    console: bool,
    shut_down: bool,
}

impl TelemetryGuard {
    /// Tracer used by the `tracing` bridge layer
    #[must_use]
    pub fn tracer(&self) -> Tracer {
        self.tracer.clone()
    }

    /// Trace export URL spans are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether spans are mirrored to stdout
    #[must_use]
    pub const fn console(&self) -> bool {
        self.console
    }

    /// Flush pending spans and stop exporting. Safe to call twice.
    ///
    /// Blocks until the batch processor finishes; call it from a blocking
    /// context (e.g. `tokio::task::spawn_blocking`) when inside a runtime.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        self.provider
            .shutdown()
            .map_err(|e| AskRagError::Telemetry(format!("failed to shut down tracer provider: {e}")))
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("{e}");
        }
    }
}

/// Build the tracer provider, register it process-wide and return its guard.
///
/// Must be called from within a Tokio runtime: the OTLP batch processor
/// runs on it.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard> {
    let endpoint = traces_endpoint(&config.otlp_endpoint);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint.clone())
        .with_timeout(EXPORT_TIMEOUT)
        .build()
        .map_err(|e| AskRagError::Telemetry(format!("failed to build OTLP exporter: {e}")))?;

    let mut builder = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]));

    if config.console {
        builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
    }

    let provider = builder.build();
    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider.clone());

    Ok(TelemetryGuard {
        provider,
        tracer,
        endpoint,
        console: config.console,
        shut_down: false,
    })
}
