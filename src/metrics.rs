use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const SCORING_TOTAL: &str = "quality_scoring_total";
pub const AI_JUDGE_FAILURES_TOTAL: &str = "quality_ai_judge_failures_total";
pub const FALLBACK_TOTAL: &str = "quality_fallback_total";
pub const AUTO_VALIDATED_TOTAL: &str = "quality_auto_validated_total";
pub const FEEDBACK_UPDATES_TOTAL: &str = "quality_feedback_updates_total";
pub const SCORING_DURATION_MS: &str = "quality_scoring_duration_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder for this process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(SCORING_TOTAL, "Scoring calls completed.");
        describe_counter!(
            AI_JUDGE_FAILURES_TOTAL,
            "AI judge calls that produced no opinion, by reason."
        );
        describe_counter!(FALLBACK_TOTAL, "Scoring calls served by the fallback path.");
        describe_counter!(AUTO_VALIDATED_TOTAL, "Pairs that passed auto-validation.");
        describe_counter!(FEEDBACK_UPDATES_TOTAL, "Community feedback re-blends.");
        describe_histogram!(SCORING_DURATION_MS, "Scoring call duration in milliseconds.");
    });
}

// Recording helpers are no-ops until a recorder is installed.

pub(crate) fn record_scored(auto_validated: bool, elapsed_ms: f64) {
    counter!(SCORING_TOTAL).increment(1);
    if auto_validated {
        counter!(AUTO_VALIDATED_TOTAL).increment(1);
    }
    histogram!(SCORING_DURATION_MS).record(elapsed_ms);
}

pub(crate) fn record_judge_failure(reason: &'static str) {
    counter!(AI_JUDGE_FAILURES_TOTAL, "reason" => reason).increment(1);
}

pub(crate) fn record_fallback() {
    counter!(FALLBACK_TOTAL).increment(1);
}

pub(crate) fn record_feedback_update() {
    counter!(FEEDBACK_UPDATES_TOTAL).increment(1);
}
