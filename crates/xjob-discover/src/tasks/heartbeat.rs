use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::SchedulerClient;

/// Shortest accepted interval; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle of the registration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatState {
    Idle,
    Announcing,
    WaitingInterval,
    Deregistering,
    Stopped,
}

/// Periodic registry announcement with one deregistration on stop.
///
/// The first announcement goes out immediately. Failed announcements are
/// logged and the loop keeps its fixed interval.
pub struct Heartbeat {
    client: SchedulerClient,
    interval: Duration,
    state: watch::Sender<HeartbeatState>,
}

impl Heartbeat {
    pub fn new(client: SchedulerClient) -> Self {
        let interval = client.config().heartbeat_interval.max(MIN_INTERVAL);
        let (state, _) = watch::channel(HeartbeatState::Idle);
        Self {
            client,
            interval,
            state,
        }
    }

    /// Override the configured interval; clamped to at least 10ms.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Subscribe to state transitions.
    pub fn state(&self) -> watch::Receiver<HeartbeatState> {
        self.state.subscribe()
    }

    pub fn spawn(self, stop: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(stop))
    }

    /// Drive the loop until `stop` is cancelled, then deregister.
    pub async fn run(self, stop: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let cfg = self.client.config();
        info!(
            key = %cfg.registry_key,
            value = %cfg.registry_value(),
            interval_ms = self.interval.as_millis() as u64,
            "registry heartbeat started"
        );

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.set(HeartbeatState::Announcing);
            tokio::select! {
                _ = stop.cancelled() => break,
                res = self.client.registry() => match res {
                    Ok(()) => debug!("registry announcement accepted"),
                    Err(e) => warn!("registry announcement failed: {}", e),
                },
            }
            self.set(HeartbeatState::WaitingInterval);
        }

        self.set(HeartbeatState::Deregistering);
        match self.client.registry_remove().await {
            Ok(()) => info!("deregistered from scheduler"),
            Err(e) => warn!("deregistration failed: {}", e),
        }
        self.set(HeartbeatState::Stopped);
    }

    fn set(&self, state: HeartbeatState) {
        self.state.send_replace(state);
    }
}
