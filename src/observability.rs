use std::net::SocketAddr;

use crate::engine::EngineError;
use crate::model::AvailabilityResult;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: single-unit availability checks. Labels: outcome.
pub const CHECKS_TOTAL: &str = "vacancy_checks_total";

/// Histogram: single-unit check latency in seconds.
pub const CHECK_DURATION_SECONDS: &str = "vacancy_check_duration_seconds";

/// Counter: conflict store queries issued. Labels: query.
pub const STORE_QUERIES_TOTAL: &str = "vacancy_store_queries_total";

// ── Fan-out metrics ─────────────────────────────────────────────

/// Histogram: distinct units per batch.
pub const BATCH_SIZE: &str = "vacancy_batch_size";

/// Histogram: batch wall time in seconds.
pub const BATCH_DURATION_SECONDS: &str = "vacancy_batch_duration_seconds";

/// Counter: batch slots that ended in an error. Labels: kind.
pub const BATCH_SLOT_ERRORS_TOTAL: &str = "vacancy_batch_slot_errors_total";

/// Histogram: candidates checked per inventory search.
pub const SEARCH_CANDIDATES: &str = "vacancy_search_candidates";

/// Histogram: free units returned per inventory search.
pub const SEARCH_RESULTS: &str = "vacancy_search_results";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Outcome label for a finished single-unit check.
pub fn outcome_label(result: &Result<AvailabilityResult, EngineError>) -> &'static str {
    match result {
        Ok(r) if r.available => "available",
        Ok(_) => "unavailable",
        Err(e) => e.kind(),
    }
}
