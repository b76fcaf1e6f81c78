use std::sync::Arc;
use std::time::{Duration, Instant};
use swipe_session::RoomRegistry;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

/// Periodically close rooms left idle past their grace period
pub fn spawn_idle_sweeper(registry: Arc<RoomRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let closed = registry.sweep_idle(Instant::now()).await;
            for room_id in closed {
                info!(room_id = %room_id, "Idle room closed");
            }
        }
    })
}
