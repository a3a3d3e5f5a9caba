//! Prometheus metrics for the catalog services.
//!
//! - recorder installation and the `/metrics` endpoint
//! - request metrics middleware
//! - product lifecycle counters ([`ProductMetrics`])
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_router, middleware::metrics_middleware};
//!
//! init_metrics()?;
//! let app = router
//!     .layer(axum::middleware::from_fn(metrics_middleware))
//!     .merge(metrics_router());
//! ```

pub mod catalog;
pub mod middleware;

pub use catalog::ProductMetrics;
pub use metrics_exporter_prometheus::BuildError;

use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Prometheus text exposition
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// `GET /metrics`
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "HTTP requests answered with a 4xx or 5xx status"
    );

    describe_counter!(
        "catalog_product_writes_total",
        "Product writes by operation (create, update, delete)"
    );
    describe_counter!(
        "catalog_product_queries_total",
        "Product lookups by query kind"
    );
    describe_histogram!(
        "catalog_product_query_results",
        "Number of products returned per query"
    );
}
