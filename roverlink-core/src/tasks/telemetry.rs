//! src/tasks/telemetry.rs
//!
//! The fixed-rate production loop: one source refresh, one state commit, one
//! fan-out per iteration, forever.

use tokio::time::{Duration, sleep};
use tracing::{error, info};

use crate::registry::ObserverRegistry;
use crate::sources::TelemetrySource;
use crate::state::RobotState;

/// Delay slept after each iteration's work completes. Drift is not
/// compensated: the effective period is work time plus this delay.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Spawns the perpetual telemetry loop as a background task. Nothing joins
/// on the returned handle under normal operation; the loop runs until
/// process shutdown.
pub fn spawn_telemetry_task(
    state: RobotState,
    registry: ObserverRegistry,
    mut source: Box<dyn TelemetrySource>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting telemetry task in {} regime...", source.regime());
        state
            .append_log(format!("[COM] LINK_ESTABLISHED: {}", source.regime()))
            .await;

        loop {
            let previous = state.snapshot().await;
            let reading = source.refresh(&previous).await;
            // Commit, then project, then push: observers never see a frame
            // from an uncommitted mutation.
            let frame = state.apply(reading).await;
            match frame.encode() {
                Ok(payload) => registry.broadcast(&payload).await,
                Err(e) => error!("Failed to encode telemetry frame: {e}"),
            }
            sleep(TICK_INTERVAL).await;
        }
    })
}
