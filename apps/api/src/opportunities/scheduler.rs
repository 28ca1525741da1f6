use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::opportunities::service::OpportunityService;

/// Spawn a background task that rebuilds the snapshot every `interval`.
/// The first tick fires immediately, so the cache is warm before the first request.
/// A failed refresh is logged and the previous snapshot keeps serving.
pub fn spawn_refresh_task(service: Arc<OpportunityService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match service.refresh().await {
                Ok(snapshot) => tracing::debug!(
                    target: "refresh",
                    count = snapshot.opportunities.len(),
                    "scheduled refresh tick"
                ),
                Err(e) => tracing::warn!(target: "refresh", error = %e, "scheduled refresh failed"),
            }
        }
    })
}
