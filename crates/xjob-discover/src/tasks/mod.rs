mod heartbeat;
pub use heartbeat::{Heartbeat, HeartbeatState};
