//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): resolutions by outcome (`matched`, `not_found`)
//! - `dispatch_route_class_total` (counter): matched routes by class (`literal`, `parameterized`)
//! - `dispatch_registered_routes` (gauge): routes in the current table
//! - `dispatch_reloads_total` (counter): config reloads by result (`ok`, `error`)
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - The Prometheus exporter runs its own listener, separate from the dispatch surface

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RouteClass;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a resolution; `class` is `None` for a miss.
pub fn record_dispatch(class: Option<RouteClass>) {
    match class {
        Some(class) => {
            counter!("dispatch_requests_total", "outcome" => "matched").increment(1);
            counter!("dispatch_route_class_total", "class" => class.as_str()).increment(1);
        }
        None => counter!("dispatch_requests_total", "outcome" => "not_found").increment(1),
    }
}

pub fn record_registered_routes(count: usize) {
    gauge!("dispatch_registered_routes").set(count as f64);
}

pub fn record_reload(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("dispatch_reloads_total", "result" => result).increment(1);
}
