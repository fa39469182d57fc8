//! src/state.rs
//!
//! The shared status record and its concurrency boundary. Both the telemetry
//! loop and the command dispatcher mutate the record, so every mutation goes
//! through the mutex here; field groups that change together change under one
//! lock acquisition.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::status::FRAME_TYPE;
use crate::models::{Regime, SourceReading, StatusRecord, TelemetryFrame};

/// How far back the log is scanned when suppressing duplicate entries.
const DEDUP_WINDOW: usize = 5;

/// Cloneable handle to the process-wide `StatusRecord`. Constructed once at
/// startup and passed into the loop, the dispatcher, and the connection
/// handlers.
#[derive(Clone)]
pub struct RobotState {
    inner: Arc<Mutex<StatusRecord>>,
}

impl RobotState {
    pub fn new(regime: Regime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusRecord::new(regime))),
        }
    }

    /// A point-in-time copy of the record, handed to sources as the
    /// "previous" state for a refresh.
    pub async fn snapshot(&self) -> StatusRecord {
        self.inner.lock().await.clone()
    }

    /// Commits one source reading and builds the bounded-view frame for it.
    /// Mutation and projection happen under a single lock so no observer can
    /// receive a frame from an uncommitted mutation.
    pub async fn apply(&self, reading: SourceReading) -> TelemetryFrame {
        let mut record = self.inner.lock().await;
        record.temperature = reading.temperature;
        record.distance = reading.distance;
        record.linked = reading.linked;
        if let Some(mode) = reading.mode {
            record.mode = mode;
        }
        for line in reading.log_lines {
            append_deduped(&mut record.log, line);
        }
        TelemetryFrame {
            kind: FRAME_TYPE.to_string(),
            regime: record.regime,
            temperature: record.temperature,
            uptime: record.uptime(),
            distance: record.distance,
            mode: record.mode.clone(),
            link_status: reading.link_status,
            log: record.log_view(reading.log_view),
        }
    }

    pub async fn append_log(&self, line: String) {
        self.inner.lock().await.log.push(line);
    }

    /// Mode change plus its log entry as one atomic mutation.
    pub async fn set_mode_with_log(&self, mode: &str, line: String) {
        let mut record = self.inner.lock().await;
        record.mode = mode.to_string();
        record.log.push(line);
    }

    pub async fn is_linked(&self) -> bool {
        self.inner.lock().await.linked
    }
}

/// Appends `line` unless it already appears among the trailing
/// `DEDUP_WINDOW` entries. Older duplicates do not suppress the append.
fn append_deduped(log: &mut Vec<String>, line: String) {
    let tail = log.len().saturating_sub(DEDUP_WINDOW);
    if !log[tail..].contains(&line) {
        log.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TempReading;

    fn reading(log_lines: Vec<&str>) -> SourceReading {
        SourceReading {
            temperature: TempReading::Celsius(50.0),
            distance: 200,
            mode: None,
            linked: true,
            link_status: "MOCK_ACTIVE".to_string(),
            log_lines: log_lines.into_iter().map(String::from).collect(),
            log_view: 12,
        }
    }

    #[tokio::test]
    async fn apply_commits_reading_before_projection() {
        let state = RobotState::new(Regime::Mock);
        let frame = state.apply(reading(vec!["[SYS] PATROL_ACTIVE"])).await;

        assert_eq!(frame.distance, 200);
        assert_eq!(frame.temperature, TempReading::Celsius(50.0));
        assert!(frame.log.contains(&"[SYS] PATROL_ACTIVE".to_string()));

        let record = state.snapshot().await;
        assert_eq!(record.distance, 200);
        assert!(record.linked);
    }

    #[tokio::test]
    async fn apply_keeps_mode_unless_reading_drives_it() {
        let state = RobotState::new(Regime::Mock);
        state
            .set_mode_with_log("ALARM", "[SYS] MODE_SWITCH: ALARM".to_string())
            .await;

        let frame = state.apply(reading(vec![])).await;
        assert_eq!(frame.mode, "ALARM");

        let mut cycled = reading(vec![]);
        cycled.mode = Some("DOCKING".to_string());
        let frame = state.apply(cycled).await;
        assert_eq!(frame.mode, "DOCKING");
    }

    #[tokio::test]
    async fn duplicate_lines_suppressed_over_trailing_window_only() {
        let state = RobotState::new(Regime::Mock);
        state.apply(reading(vec!["[SYS] PATROL_ACTIVE", "[NAV] PATH_OPTIMIZED"])).await;
        // Same lines again while still inside the trailing window: no-op.
        state.apply(reading(vec!["[SYS] PATROL_ACTIVE", "[NAV] PATH_OPTIMIZED"])).await;

        let record = state.snapshot().await;
        let patrol = record
            .log
            .iter()
            .filter(|l| l.as_str() == "[SYS] PATROL_ACTIVE")
            .count();
        assert_eq!(patrol, 1);

        // Push the line out of the trailing window, then it appends again.
        for i in 0..DEDUP_WINDOW {
            state.append_log(format!("filler {i}")).await;
        }
        state.apply(reading(vec!["[SYS] PATROL_ACTIVE"])).await;
        let record = state.snapshot().await;
        let patrol = record
            .log
            .iter()
            .filter(|l| l.as_str() == "[SYS] PATROL_ACTIVE")
            .count();
        assert_eq!(patrol, 2);
    }

    #[tokio::test]
    async fn frame_log_never_exceeds_view_size() {
        let state = RobotState::new(Regime::Live);
        for i in 0..40 {
            state.append_log(format!("entry {i}")).await;
        }
        let mut live = reading(vec![]);
        live.log_view = 5;
        let frame = state.apply(live).await;
        assert_eq!(frame.log.len(), 5);
        assert_eq!(frame.log.last().unwrap(), "entry 39");

        // Backing store still holds everything plus the boot entry.
        assert_eq!(state.snapshot().await.log.len(), 41);
    }

    #[tokio::test]
    async fn uptime_is_monotonic_across_frames() {
        let state = RobotState::new(Regime::Mock);
        let first = state.apply(reading(vec![])).await;
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        let second = state.apply(reading(vec![])).await;
        // HH:MM:SS compares correctly as a string.
        assert!(first.uptime <= second.uptime);
    }
}
