use axum::{extract::State, routing, Router};
use metrics_exporter_prometheus::PrometheusHandle;

pub fn app(metrics: Option<PrometheusHandle>) -> Router {
    Router::new()
        .route("/", routing::get(index))
        .route("/metrics", routing::get(render_metrics))
        .with_state(metrics)
}

pub async fn index() -> &'static str {
    "purge janitor"
}

async fn render_metrics(State(metrics): State<Option<PrometheusHandle>>) -> String {
    metrics.map(|handle| handle.render()).unwrap_or_default()
}
