//! Prometheus Metrics Module
//!
//! Application-wide metrics collection for the realtime layer.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active realtime connections gauge
pub static REALTIME_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "realtime_connections_active",
            "Number of active realtime connections",
        )
        .namespace("messenger_server"),
    )
    .expect("Failed to create REALTIME_CONNECTIONS_ACTIVE metric")
});

/// Accepted (persisted and broadcast) messages counter
pub static MESSAGES_ACCEPTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "messages_accepted_total",
            "Total messages persisted and broadcast",
        )
        .namespace("messenger_server"),
    )
    .expect("Failed to create MESSAGES_ACCEPTED_TOTAL metric")
});

/// Silently dropped realtime send events counter
pub static SENDS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "sends_rejected_total",
            "Realtime send events dropped before persistence",
        )
        .namespace("messenger_server"),
    )
    .expect("Failed to create SENDS_REJECTED_TOTAL metric")
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(REALTIME_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register REALTIME_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(MESSAGES_ACCEPTED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_ACCEPTED_TOTAL");
    registry
        .register(Box::new(SENDS_REJECTED_TOTAL.clone()))
        .expect("Failed to register SENDS_REJECTED_TOTAL");
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
