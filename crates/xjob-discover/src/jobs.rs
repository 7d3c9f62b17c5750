//! Job-admin passthrough.
//!
//! Thin wrappers over the scheduler's job management endpoints. Bodies are
//! forwarded as-is and responses are returned raw; nothing here is
//! interpreted by the agent.

use serde::Serialize;
use tracing::debug;
use xjob_model::{AddJobInfo, JobId};

use crate::client::SchedulerClient;
use crate::errors::DiscoverError;

#[derive(Debug, Serialize)]
struct JobIdBody {
    id: JobId,
}

impl SchedulerClient {
    /// Create a job, JSON body.
    pub async fn add_job(&self, info: &AddJobInfo) -> Result<String, DiscoverError> {
        let url = self.config().job_url("add");
        debug!(%url, handler = %info.executor_handler, "adding job");
        self.send_raw(self.post(url).json(info)).await
    }

    /// Create a job, form-encoded body.
    pub async fn add_job_form(&self, info: &AddJobInfo) -> Result<String, DiscoverError> {
        let url = self.config().job_url("add");
        debug!(%url, handler = %info.executor_handler, "adding job (form)");
        self.send_raw(self.post(url).form(info)).await
    }

    pub async fn stop_job(&self, id: JobId) -> Result<String, DiscoverError> {
        let url = self.config().job_url("stop");
        self.send_raw(self.post(url).json(&JobIdBody { id })).await
    }

    pub async fn start_job(&self, id: JobId) -> Result<String, DiscoverError> {
        let url = self.config().job_url("start");
        self.send_raw(self.post(url).form(&JobIdBody { id })).await
    }

    async fn send_raw(&self, req: reqwest::RequestBuilder) -> Result<String, DiscoverError> {
        let response = req.send().await?;
        Ok(response.text().await?)
    }
}
