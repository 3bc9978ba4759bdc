//! Business metrics for the registration service.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `registration_batches_total{outcome}` - Batches by outcome
//!   (accepted, bad_request, conflict, internal)
//! - `registration_records_created_total` - Attendee rows written

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Register metric descriptions.
///
/// Call once at startup, before any metric is recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "registration_batches_total",
        "Total number of registration batches by outcome (accepted, bad_request, conflict, internal)"
    );
    describe_counter!(
        "registration_records_created_total",
        "Total number of attendee records written to the inscription table"
    );
}

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// # Errors
///
/// Returns the exporter's error if the recorder is already installed or the
/// listener cannot bind.
pub fn install_exporter(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_business_metrics();
    tracing::info!(%addr, "Prometheus metrics available at http://{addr}/metrics");
    Ok(())
}
