use std::time::Duration;

use clap::Parser;
use xjob_discover::{DEFAULT_JOB_PATH_PREFIX, DiscoverConfig};
use xjob_observe::{LoggerConfig, LoggerError, LoggerFormat};

#[derive(Parser, Debug, Clone)]
#[command(name = "xjob-agentd")]
#[command(version)]
#[command(about = "Executor agent for an XXL-JOB style scheduling center")]
pub struct Args {
    /// Scheduler base URL
    #[arg(long, env = "XJOB_SCHEDULER_ADDR", default_value = "http://127.0.0.1:8080/xxl-job-admin")]
    pub scheduler_addr: String,

    /// Shared access token (sent as XXL-JOB-ACCESS-TOKEN)
    #[arg(long, env = "XJOB_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Application name to register under
    #[arg(long, env = "XJOB_REGISTRY_KEY", default_value = "xjob-executor")]
    pub registry_key: String,

    /// Host the scheduler should call back on (defaults to this machine's hostname)
    #[arg(long, env = "XJOB_EXECUTOR_IP")]
    pub executor_ip: Option<String>,

    /// Port of the command surface
    #[arg(long, env = "XJOB_EXECUTOR_PORT", default_value = "9999")]
    pub executor_port: u16,

    /// Address to bind the command surface on
    #[arg(long, env = "XJOB_LISTEN", default_value = "0.0.0.0")]
    pub listen: String,

    /// Seconds between registry announcements
    #[arg(long, env = "XJOB_HEARTBEAT_SECS", default_value = "20")]
    pub heartbeat_secs: u64,

    /// Timeout of outbound scheduler calls, in seconds
    #[arg(long, env = "XJOB_REQUEST_TIMEOUT_SECS", default_value = "5")]
    pub request_timeout_secs: u64,

    /// Path prefix of the scheduler's job admin endpoints
    #[arg(long, env = "XJOB_JOB_PATH_PREFIX", default_value = DEFAULT_JOB_PATH_PREFIX)]
    pub job_path_prefix: String,

    /// Jobs whose logs are kept in memory for /log
    #[arg(long, env = "XJOB_LOG_CAPACITY", default_value = "256")]
    pub log_capacity: usize,

    /// Log filter, e.g. "info" or "info,xjob.job=debug"
    #[arg(long, env = "XJOB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format: text, json or journald
    #[arg(long, env = "XJOB_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Args {
    pub fn logger_config(&self) -> Result<LoggerConfig, LoggerError> {
        let format: LoggerFormat = self.log_format.parse()?;
        Ok(LoggerConfig::new(format, self.log_level.clone()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen, self.executor_port)
    }

    pub fn discover_config(&self) -> DiscoverConfig {
        let host = self.executor_ip.clone().unwrap_or_else(default_host);
        DiscoverConfig {
            scheduler_addr: self.scheduler_addr.clone(),
            access_token: self.access_token.clone().filter(|t| !t.is_empty()),
            registry_key: self.registry_key.clone(),
            executor_addr: format!("{}:{}", host, self.executor_port),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs.max(1)),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            job_path_prefix: self.job_path_prefix.clone(),
        }
    }
}

fn default_host() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
