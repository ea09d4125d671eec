// Prometheus metrics definitions for the stats backend.

use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Counters ─────────────────────────────────────────────────────

    /// Commands handled, by command name and outcome (`ok`, error code, `panic`).
    pub static ref COMMANDS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("bfstat_commands_total", "Total commands handled"),
        &["command", "outcome"],
    )
    .unwrap();

    /// Upstream API calls, by back-end (`gametools`, `tracker`) and outcome.
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("bfstat_upstream_requests_total", "Total upstream API requests"),
        &["backend", "outcome"],
    )
    .unwrap();

    /// Image renders, by outcome.
    pub static ref RENDERS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("bfstat_renders_total", "Total HTML-to-image renders"),
        &["outcome"],
    )
    .unwrap();

    /// Match commentary that fell back to empty text.
    pub static ref COMMENTARY_FALLBACKS_TOTAL: IntCounter = IntCounter::new(
        "bfstat_commentary_fallbacks_total",
        "Commentary generations that fell back to empty text",
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Upstream API latency in seconds, by back-end.
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "bfstat_upstream_request_duration_seconds",
            "Upstream API request duration in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]),
        &["backend"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(COMMANDS_TOTAL.clone()),
        Box::new(UPSTREAM_REQUESTS_TOTAL.clone()),
        Box::new(RENDERS_TOTAL.clone()),
        Box::new(COMMENTARY_FALLBACKS_TOTAL.clone()),
        Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
