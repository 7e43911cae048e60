//! Metrics collection and exposition.
//!
//! # Metrics
//! - `servlet_router_resolutions_total` (counter): lookups by deployment and
//!   outcome (match kind, `no_match` or `error`)
//! - `servlet_router_mapping_entries` (gauge): url-patterns per deployment
//! - `servlet_router_reloads_total` (counter): config reloads by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, CLI)
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(
        "servlet_router_resolutions_total",
        "Path resolutions by deployment and outcome"
    );
    describe_gauge!(
        "servlet_router_mapping_entries",
        "Registered url-patterns per deployment"
    );
    describe_counter!("servlet_router_reloads_total", "Config reloads by outcome");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_resolution(deployment: &str, outcome: &'static str) {
    counter!(
        "servlet_router_resolutions_total",
        "deployment" => deployment.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_table_size(deployment: &str, entries: usize) {
    gauge!("servlet_router_mapping_entries", "deployment" => deployment.to_string())
        .set(entries as f64);
}

pub fn record_reload(outcome: &'static str) {
    counter!("servlet_router_reloads_total", "outcome" => outcome).increment(1);
}
