// ── Background refresh ──
//
// Periodic refresh loop spawned by `Coordinator::start`. Failures are
// logged and retried on the next tick; the stale snapshot stays readable.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Coordinator;
use crate::client::ApplianceClient;

/// Periodically refresh the appliance until cancelled.
pub(super) async fn refresh_task<C: ApplianceClient>(
    coordinator: Coordinator<C>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(
                        appliance = %coordinator.info().unique_id,
                        error = %e,
                        "periodic refresh failed"
                    );
                }
            }
        }
    }

    debug!(appliance = %coordinator.info().unique_id, "refresh task stopped");
}
