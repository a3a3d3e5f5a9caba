//! Product catalog counters.

use metrics::{counter, histogram};

/// Recorder for product lifecycle and query metrics
pub struct ProductMetrics;

impl ProductMetrics {
    pub fn record_created() {
        counter!("catalog_product_writes_total", "operation" => "create").increment(1);
    }

    pub fn record_updated() {
        counter!("catalog_product_writes_total", "operation" => "update").increment(1);
    }

    pub fn record_deleted() {
        counter!("catalog_product_writes_total", "operation" => "delete").increment(1);
    }

    /// `kind` is a fixed label such as "all", "category" or "price_range".
    pub fn record_query(kind: &'static str, results: usize) {
        counter!("catalog_product_queries_total", "kind" => kind).increment(1);
        histogram!("catalog_product_query_results", "kind" => kind).record(results as f64);
    }
}
