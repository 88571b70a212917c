//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("postkeeper_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");

    // Database Metrics
    pub static ref DB_QUERIES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("postkeeper_db_queries_total", "Total number of database queries"),
        &["operation", "table"]
    ).expect("metric can be created");
    pub static ref DB_QUERY_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "postkeeper_db_query_duration_seconds",
            "Database query duration in seconds"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["operation", "table"]
    ).expect("metric can be created");

    // Import/Export Metrics
    pub static ref USERS_IMPORTED_TOTAL: IntCounter = IntCounter::new(
        "postkeeper_users_imported_total",
        "Total number of users imported"
    ).expect("metric can be created");
    pub static ref POSTS_IMPORTED_TOTAL: IntCounter = IntCounter::new(
        "postkeeper_posts_imported_total",
        "Total number of posts imported"
    ).expect("metric can be created");
    pub static ref EXPORTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("postkeeper_exports_total", "Total number of spreadsheet exports"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("postkeeper_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Call once at startup; registering twice fails.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DB_QUERIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DB_QUERY_DURATION_SECONDS.clone()))?;
    REGISTRY.register(Box::new(USERS_IMPORTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(POSTS_IMPORTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXPORTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ERRORS_TOTAL.clone()))?;

    tracing::info!("Metrics registry initialized");
    Ok(())
}

/// Record one database query and its duration.
pub fn observe_db_query(operation: &str, table: &str, started: Instant) {
    DB_QUERIES_TOTAL
        .with_label_values(&[operation, table])
        .inc();
    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[operation, table])
        .observe(started.elapsed().as_secs_f64());
}

/// Record a handled HTTP request.
pub fn record_request(method: &str, endpoint: &str, status: u16) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();
}
