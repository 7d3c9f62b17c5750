//! Outbound side of the executor agent: registry heartbeat, completion
//! callbacks, and the job-admin passthrough.

mod tasks;
pub use tasks::{Heartbeat, HeartbeatState};

mod config;
pub use config::{DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_JOB_PATH_PREFIX, DiscoverConfig};

mod errors;
pub use errors::DiscoverError;

mod client;
pub use client::SchedulerClient;

mod callback;
mod jobs;
