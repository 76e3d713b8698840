use axum::Json;

use crate::metrics::{self, MetricsSnapshot};

#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Process-wide request and cache counters", body = MetricsSnapshot),
    ),
    tag = "Metrics"
)]
pub async fn metrics_snapshot() -> Json<MetricsSnapshot> {
    Json(metrics::snapshot())
}
