// Tracing initialization: env filter, fmt output and optional OTLP export.
use std::sync::OnceLock;

use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LoggingConfig, OtelConfig};

const SERVICE_NAME: &str = "hospital-server";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

pub fn init_tracing(logging: &LoggingConfig, otel: &OtelConfig) {
    // Prefer RUST_LOG from env, otherwise use the configured level.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&logging.level));

    let provider = match build_tracer_provider(otel) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Warning: OTLP exporter disabled: {e}");
            None
        }
    };
    let otel_layer = provider.map(|provider| {
        let tracer = provider.tracer(SERVICE_NAME);
        global::set_tracer_provider(provider.clone());
        let _ = TRACER_PROVIDER.set(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(otel_layer)
        .try_init();

    if otel.enabled && TRACER_PROVIDER.get().is_some() {
        tracing::info!(
            endpoint = otel.endpoint.as_deref().unwrap_or(""),
            sample_ratio = ?otel.sample_ratio,
            environment = ?otel.environment,
            "OTLP trace export enabled"
        );
    }
}

/// Builds the span pipeline when export is enabled and an endpoint is set.
fn build_tracer_provider(otel: &OtelConfig) -> anyhow::Result<Option<SdkTracerProvider>> {
    let endpoint = match otel.endpoint.as_deref() {
        Some(endpoint) if otel.enabled && !endpoint.is_empty() => endpoint,
        _ => return Ok(None),
    };

    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()?;

    let mut resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")));
    if let Some(environment) = &otel.environment {
        resource = resource.with_attribute(KeyValue::new(
            "deployment.environment",
            environment.clone(),
        ));
    }

    let sampler = match otel.sample_ratio {
        Some(ratio) => Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(ratio))),
        None => Sampler::ParentBased(Box::new(Sampler::AlwaysOn)),
    };

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(sampler)
        .with_resource(resource.build())
        .build();
    Ok(Some(provider))
}

/// Flushes pending spans and stops the exporter.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTLP shutdown failed: {e}");
        }
    }
}
