use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::post,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use xjob_model::{KillRequest, LogRequest, LogResult, ReturnT, RunRequest};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /run - Admit a trigger
    /// - POST /kill - Cancel a live run
    /// - POST /log - Page through a run's log
    pub fn router(self) -> Router {
        Router::new()
            .route("/run", post(run::<H>))
            .route("/kill", post(kill::<H>))
            .route("/log", post(log::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /run
async fn run<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<Json<ReturnT<()>>, ApiError>
where
    H: ApiHandler,
{
    let req: RunRequest = parse("/run", &body)?;
    let job_id = req.job_id;
    handler.run(req).await?;
    debug!(job_id, "run admitted");

    Ok(Json(ReturnT::success()))
}

/// POST /kill
async fn kill<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<Json<ReturnT<()>>, ApiError>
where
    H: ApiHandler,
{
    let req: KillRequest = parse("/kill", &body)?;
    handler.kill(req.job_id).await?;
    debug!(job_id = req.job_id, "run killed");

    Ok(Json(ReturnT::success()))
}

/// POST /log
async fn log<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<Json<ReturnT<LogResult>>, ApiError>
where
    H: ApiHandler,
{
    let req: LogRequest = parse("/log", &body)?;
    let page = handler.log(req).await?;

    Ok(Json(ReturnT::with_content(page)))
}

fn parse<T: DeserializeOwned>(route: &'static str, body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(
            route,
            payload = %String::from_utf8_lossy(body),
            "malformed request: {}",
            e
        );
        ApiError::MalformedRequest
    })
}
