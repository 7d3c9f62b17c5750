use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("scheduler rejected request: {0}")]
    Rejected(String),

    #[error("invalid scheduler response: {0}")]
    InvalidResponse(String),
}
