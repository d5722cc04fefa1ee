//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_tree_requests_total` (counter): requests by outcome and route pattern
//! - `route_tree_request_duration_seconds` (histogram): latency by outcome
//!
//! # Design Decisions
//! - Route label is the registration pattern (`/users/:id`), never the raw
//!   path, to keep cardinality bounded
//! - Recording is a no-op until a recorder is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a request left the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NotFound,
    BadRequest,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NotFound => "not_found",
            Outcome::BadRequest => "bad_request",
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a dispatched request.
pub fn record_request(outcome: Outcome, route: Option<&str>, start_time: Instant) {
    let route = route.unwrap_or("none").to_string();
    counter!(
        "route_tree_requests_total",
        "outcome" => outcome.as_str(),
        "route" => route
    )
    .increment(1);
    histogram!(
        "route_tree_request_duration_seconds",
        "outcome" => outcome.as_str()
    )
    .record(start_time.elapsed().as_secs_f64());
}
