//! Logging and optional OpenTelemetry export

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::VERSION;
use crate::config::LoggingConfig;

const SERVICE: &str = "weekendcast";

/// Flushes and shuts down the exporters when dropped
#[must_use = "telemetry is shut down when the guard is dropped"]
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {err}");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("Failed to shut down logger provider: {err}");
            }
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{level}'")),
    }
}

fn otlp_url(endpoint: &str, signal: &str) -> String {
    format!("{}/v1/{signal}", endpoint.trim_end_matches('/'))
}

fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE)
        .with_attribute(KeyValue::new(SERVICE_VERSION, VERSION))
        .build()
}

fn otlp_providers(endpoint: &str) -> Result<(SdkTracerProvider, SdkLoggerProvider)> {
    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(otlp_url(endpoint, "traces"))
        .build()
        .context("Failed to build OTLP span exporter")?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource())
        .build();

    let log_exporter = LogExporter::builder()
        .with_http()
        .with_endpoint(otlp_url(endpoint, "logs"))
        .build()
        .context("Failed to build OTLP log exporter")?;
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource())
        .build();

    Ok((tracer_provider, logger_provider))
}

/// Install the global subscriber.
///
/// Console output is `pretty` or `json` per configuration. With an
/// `otlp_endpoint`, spans and log events are exported as well.
pub fn init(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_current_span(true).boxed(),
        _ => fmt::layer().with_target(true).boxed(),
    };

    let mut guard = TelemetryGuard::default();
    let (trace_layer, log_layer) = match config.otlp_endpoint.as_deref() {
        Some(endpoint) => {
            let (tracer_provider, logger_provider) = otlp_providers(endpoint)?;
            let trace_layer = tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer(SERVICE));
            // exporter internals would otherwise feed back into the exporter
            let log_layer = OpenTelemetryTracingBridge::new(&logger_provider).with_filter(filter_fn(|meta| {
                !["opentelemetry", "hyper", "reqwest", "h2"]
                    .iter()
                    .any(|prefix| meta.target().starts_with(prefix))
            }));
            guard.tracer_provider = Some(tracer_provider);
            guard.logger_provider = Some(logger_provider);
            (Some(trace_layer), Some(log_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.level)?)
        .with(fmt_layer)
        .with(trace_layer)
        .with(log_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = config.otlp_endpoint.as_deref() {
        tracing::info!(endpoint, "Exporting telemetry over OTLP");
    }
    Ok(guard)
}
