//! Process-wide logging setup for the executor agent.
//!
//! Call [`logger_init`] once at startup; everything else logs through `tracing`.

mod logger;
pub use logger::*;
