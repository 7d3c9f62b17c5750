//! Wire types shared by the executor agent and the scheduling center.
//!
//! Everything here is plain data: (de)serializable payloads for the inbound
//! command surface (`/run`, `/kill`, `/log`), the outbound scheduler channel
//! (registry, callback, job admin) and the strategy tags both sides exchange.

mod domain;
pub use domain::*;

mod command;
pub use command::{KillRequest, LogRequest, LogResult, RunRequest};

mod admin;
pub use admin::{AddJobInfo, MisfireStrategy, cron_at};
