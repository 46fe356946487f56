//! Telemetry initialization and configuration

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, for log shippers.
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("failed to install OTLP exporter: {0}")]
    Exporter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Initialize console logging.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Logs go to stderr
/// so command output on stdout stays machine readable. Only the first call
/// installs anything; later calls return `Ok(())`.
///
/// # Example
/// ```
/// use a2a_telemetry::init_telemetry;
/// init_telemetry("a2a-host").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), TelemetryError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(service_name, None, LogFormat::Text);
    });
    result
}

/// Initialize telemetry with OpenTelemetry OTLP span export.
///
/// # Arguments
/// * `service_name` - Name of the service for trace identification
/// * `endpoint` - OTLP collector endpoint (e.g., "http://localhost:4317")
///
/// Must be called from within a tokio runtime; the batch exporter runs on it.
pub fn init_with_otlp(service_name: &str, endpoint: &str) -> Result<(), TelemetryError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(service_name, Some(endpoint), LogFormat::Text);
    });
    result
}

/// Initialize telemetry with an explicit log format and optional OTLP export.
pub fn init_with_format(
    service_name: &str,
    format: LogFormat,
    otlp_endpoint: Option<&str>,
) -> Result<(), TelemetryError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(service_name, otlp_endpoint, format);
    });
    result
}

/// Shutdown telemetry and flush any pending spans
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn install(service_name: &str, otlp_endpoint: Option<&str>, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let otel_layer = match otlp_endpoint {
        Some(endpoint) => {
            Some(tracing_opentelemetry::OpenTelemetryLayer::new(otlp_tracer(service_name, endpoint)?))
        }
        None => None,
    };

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    match otlp_endpoint {
        Some(endpoint) => tracing::info!(
            service.name = service_name,
            otlp.endpoint = endpoint,
            "Telemetry initialized with OpenTelemetry"
        ),
        None => tracing::info!(service.name = service_name, "Telemetry initialized"),
    }

    Ok(())
}

fn otlp_tracer(
    service_name: &str,
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::Tracer, TelemetryError> {
    use opentelemetry_otlp::WithExportConfig;

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
        .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
            opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                "service.name",
                service_name.to_string(),
            )]),
        ))
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|e| TelemetryError::Exporter(e.to_string()))
}
