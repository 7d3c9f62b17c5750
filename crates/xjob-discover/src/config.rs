use std::time::Duration;

use xjob_model::RegistryParam;

/// Interval between registry announcements.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
/// Path prefix of the scheduler's job admin endpoints.
pub const DEFAULT_JOB_PATH_PREFIX: &str = "/xxl-job-new/jobinfo";

/// Connection settings for the scheduling center.
#[derive(Debug, Clone)]
pub struct DiscoverConfig {
    /// Base URL of the scheduler, e.g. `http://scheduler:8080/xxl-job-admin`.
    pub scheduler_addr: String,
    /// Shared token sent as `XXL-JOB-ACCESS-TOKEN`.
    pub access_token: Option<String>,
    /// Application name this agent registers under.
    pub registry_key: String,
    /// `host:port` the scheduler should call this agent on.
    pub executor_addr: String,
    pub heartbeat_interval: Duration,
    /// Per-request timeout of every outbound call.
    pub request_timeout: Duration,
    pub job_path_prefix: String,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            scheduler_addr: "http://127.0.0.1:8080/xxl-job-admin".to_string(),
            access_token: None,
            registry_key: "xjob-executor".to_string(),
            executor_addr: "127.0.0.1:9999".to_string(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            request_timeout: Duration::from_secs(5),
            job_path_prefix: DEFAULT_JOB_PATH_PREFIX.to_string(),
        }
    }
}

impl DiscoverConfig {
    /// Address announced to the scheduler.
    pub fn registry_value(&self) -> String {
        format!("http://{}", self.executor_addr)
    }

    /// Current registry announcement.
    pub fn announcement(&self) -> RegistryParam {
        RegistryParam::executor(&self.registry_key, self.registry_value())
            .with_access_token(self.access_token.clone())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.scheduler_addr.trim_end_matches('/'), path)
    }

    pub(crate) fn job_url(&self, action: &str) -> String {
        self.url(&format!("{}/{}", self.job_path_prefix.trim_end_matches('/'), action))
    }
}
