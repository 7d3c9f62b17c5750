use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use xjob_model::{ACCESS_TOKEN_HEADER, HandleCallback, ReturnT};

use crate::config::DiscoverConfig;
use crate::errors::DiscoverError;

const REGISTRY_PATH: &str = "/api/registry";
const REGISTRY_REMOVE_PATH: &str = "/api/registryRemove";
const CALLBACK_PATH: &str = "/api/callback";

/// Outbound client for the scheduling center.
///
/// Cheap to clone; all clones share one connection pool and config.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    http: reqwest::Client,
    config: Arc<DiscoverConfig>,
}

impl SchedulerClient {
    pub fn new(config: DiscoverConfig) -> Result<Self, DiscoverError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &DiscoverConfig {
        &self.config
    }

    /// Announce this agent under its registry key.
    pub async fn registry(&self) -> Result<(), DiscoverError> {
        let param = self.config.announcement();
        self.post_envelope(REGISTRY_PATH, &param).await
    }

    /// Withdraw the announcement made by [`SchedulerClient::registry`].
    pub async fn registry_remove(&self) -> Result<(), DiscoverError> {
        let param = self.config.announcement();
        self.post_envelope(REGISTRY_REMOVE_PATH, &param).await
    }

    /// Report the outcome of one execution.
    pub async fn callback(&self, callback: &HandleCallback) -> Result<(), DiscoverError> {
        self.post_envelope(CALLBACK_PATH, callback).await
    }

    pub(crate) fn post(&self, url: String) -> reqwest::RequestBuilder {
        let req = self.http.post(url);
        match self.config.access_token.as_deref() {
            Some(token) if !token.is_empty() => req.header(ACCESS_TOKEN_HEADER, token),
            _ => req,
        }
    }

    async fn post_envelope<B>(&self, path: &str, body: &B) -> Result<(), DiscoverError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        debug!(%url, "posting to scheduler");

        let response = self.post(url).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DiscoverError::Rejected(format!("http status {status}, body: {body}")));
        }
        let envelope: ReturnT<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            DiscoverError::InvalidResponse(format!("failed to parse response: {e}, body: {body}"))
        })?;
        validate_response(envelope)
    }
}

fn validate_response(envelope: ReturnT<serde_json::Value>) -> Result<(), DiscoverError> {
    if !envelope.is_success() {
        let msg = envelope
            .msg
            .unwrap_or_else(|| format!("code {}", envelope.code));
        return Err(DiscoverError::Rejected(msg));
    }
    Ok(())
}
