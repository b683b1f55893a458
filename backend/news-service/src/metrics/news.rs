use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

lazy_static! {
    /// News committed together with their feed fan-out.
    pub static ref NEWS_PUBLISHED_TOTAL: IntCounter = register_int_counter!(
        "news_published_total",
        "Total news items published"
    )
    .expect("failed to register news_published_total");

    /// Feed rows written per published news item.
    pub static ref FEED_FANOUT_ROWS: Histogram = register_histogram!(
        "feed_fanout_rows",
        "Feed rows written per published news item",
        vec![0.0, 1.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0]
    )
    .expect("failed to register feed_fanout_rows");

    /// Toggle outcomes by relation (subscription/favorite) and resulting state (on/off).
    pub static ref TOGGLE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "toggle_total",
        "Membership toggles segmented by relation and resulting state",
        &["relation", "state"]
    )
    .expect("failed to register toggle_total");

    /// Blob uploads by kind and result (stored/forbidden/error).
    pub static ref BLOB_UPLOAD_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blob_upload_total",
        "Attachment uploads segmented by kind and outcome",
        &["kind", "result"]
    )
    .expect("failed to register blob_upload_total");

    /// Login attempts by principal (user/media) and result.
    pub static ref LOGIN_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "login_attempts_total",
        "Login attempts segmented by principal and outcome",
        &["principal", "result"]
    )
    .expect("failed to register login_attempts_total");
}

pub fn record_toggle(relation: &str, active: bool) {
    TOGGLE_TOTAL
        .with_label_values(&[relation, if active { "on" } else { "off" }])
        .inc();
}

pub fn record_publication(fanout_rows: u64) {
    NEWS_PUBLISHED_TOTAL.inc();
    FEED_FANOUT_ROWS.observe(fanout_rows as f64);
}

pub fn record_upload(kind: &str, result: &str) {
    BLOB_UPLOAD_TOTAL.with_label_values(&[kind, result]).inc();
}

pub fn record_login(principal: &str, result: &str) {
    LOGIN_ATTEMPTS_TOTAL
        .with_label_values(&[principal, result])
        .inc();
}
