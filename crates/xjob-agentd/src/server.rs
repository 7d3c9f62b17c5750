use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;
use xjob_prometheus::PrometheusMetrics;

/// Command surface plus `GET /metrics`.
pub fn router(api: Router, metrics: Arc<PrometheusMetrics>) -> Router {
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics);
    api.merge(metrics_routes)
}

/// GET /metrics
async fn metrics_handler(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(e) => {
            error!("failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
