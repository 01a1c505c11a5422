use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const RUNS_TOTAL: &str = "purge_job_runs_total";
pub const RUN_DURATION_SECONDS: &str = "purge_job_duration_seconds";

/// Installs the global Prometheus recorder and returns the handle used to render `/metrics`.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    const EXPONENTIAL_SECONDS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
    ];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(RUN_DURATION_SECONDS.to_string()),
            EXPONENTIAL_SECONDS,
        )?
        .install_recorder()
}

/// Records the end of a purge run. `outcome` is `completed`, `skipped` or an error kind.
pub fn record_run(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!(RUNS_TOTAL, "outcome" => outcome).increment(1);
    ::metrics::histogram!(RUN_DURATION_SECONDS, "outcome" => outcome).record(elapsed.as_secs_f64());
}
