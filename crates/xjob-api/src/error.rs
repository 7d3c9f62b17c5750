use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Decode details stay in the log; callers get a fixed message.
    #[error("malformed request")]
    MalformedRequest,

    #[error("{0}")]
    Core(#[from] xjob_core::CoreError),
}

/// Failures travel inside the `ReturnT` envelope with HTTP 200, which is
/// what the scheduler expects from an executor.
#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = xjob_model::ReturnT::<()>::fail(self.to_string());
        axum::Json(body).into_response()
    }
}
