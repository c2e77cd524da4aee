use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Collaborators whose failures are counted separately.
const COLLABORATORS: &[&str] = &[
    "ledger",
    "reputation",
    "sanctions",
    "mev",
    "summarizer",
    "counterparty_reputation",
];

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Pre-register every series so it appears before the first event.
pub fn register_metrics() {
    counter!("analyses_total").absolute(0);

    for collaborator in COLLABORATORS {
        counter!("collaborator_failures_total", "collaborator" => *collaborator).absolute(0);
    }
    for severity in ["critical", "high", "medium", "low"] {
        counter!("risk_findings_total", "severity" => severity).absolute(0);
    }
    for cache in ["reputation", "sanctions"] {
        counter!("cache_hits_total", "cache" => cache).absolute(0);
    }

    // Histogram is lazily created on first record; force creation.
    histogram!("analysis_latency_seconds").record(0.0);
}
