// Metrics module for Prometheus observability

mod registry;

pub use registry::{
    gather_metrics, ADVISOR_CALLS, ADVISOR_DURATION, CACHE_OPERATIONS, CONVERSATION_SESSIONS,
    REQUESTS_TOTAL, REQUEST_DURATION,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

/// Helper to record advisor call metrics
pub fn record_advisor_call(operation: &str, status_code: u16, duration_secs: f64) {
    ADVISOR_CALLS
        .with_label_values(&[operation, &status_code.to_string()])
        .inc();

    ADVISOR_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}

pub fn record_cache_operation(operation: &str) {
    CACHE_OPERATIONS.with_label_values(&[operation]).inc();
}

pub fn update_conversation_sessions(count: usize) {
    CONVERSATION_SESSIONS.set(count as f64);
}
