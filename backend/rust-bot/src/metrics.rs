use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Bot Metrics
    pub static ref UPDATES_RECEIVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bot_updates_received_total",
        "Total number of Telegram updates accepted by the webhook",
        &["status"]
    )
    .unwrap();

    pub static ref COMMANDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bot_commands_total",
        "Total number of handled bot commands",
        &["command"]
    )
    .unwrap();

    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bot_submissions_total",
        "Answer submissions by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref KNOWN_USERS: IntGauge = register_int_gauge!(
        "bot_known_users",
        "Number of users with a session state in memory"
    )
    .unwrap();

    // Storage Metrics
    pub static ref STATS_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "stats_writes_total",
        "Stats document writes",
        &["status"]
    )
    .unwrap();

    pub static ref EXPORTS_GENERATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exports_generated_total",
        "Spreadsheet exports",
        &["status"]
    )
    .unwrap();

    pub static ref TELEGRAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "telegram_requests_total",
        "Outbound Bot API calls",
        &["method", "status"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

pub fn status_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}
