use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static CART_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "storefront_cart_operations_total",
        "Cart operations by kind and outcome",
        &["op", "outcome"]
    )
    .expect("register cart_operations_total")
});

pub static STORAGE_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "storefront_cart_storage_writes_total",
        "Persisted cart snapshot writes by result",
        &["result"]
    )
    .expect("register storage_writes_total")
});

pub static INVENTORY_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "storefront_cart_inventory_request_duration_seconds",
        "Inventory service request duration in seconds",
        &["endpoint"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register inventory_request_duration")
});

pub fn record_operation(op: &str, outcome: &str) {
    CART_OPERATIONS_TOTAL.with_label_values(&[op, outcome]).inc();
}

pub fn record_storage_write(ok: bool) {
    STORAGE_WRITES_TOTAL
        .with_label_values(&[if ok { "ok" } else { "error" }])
        .inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_operations_show_up_in_exposition() {
        record_operation("add", "applied");
        record_storage_write(true);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("storefront_cart_operations_total"));
        assert!(body.contains("storefront_cart_storage_writes_total"));
    }
}
