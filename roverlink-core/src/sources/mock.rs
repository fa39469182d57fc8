//! src/sources/mock.rs
//!
//! Synthetic telemetry for demos and testing: a repeating playlist of named
//! profiles, with bounded per-tick sensor noise.

use async_trait::async_trait;
use rand::Rng;

use super::TelemetrySource;
use crate::models::{Regime, SourceReading, StatusRecord, TempReading};

/// Ticks each profile stays active before the playlist advances.
pub const PROFILE_WINDOW: u64 = 20;

/// Entries of the backing log exposed in a mock projection.
pub const MOCK_LOG_VIEW: usize = 12;

pub const MOCK_LINK_LABEL: &str = "MOCK_ACTIVE";

const TEMP_JITTER: f64 = 1.0;
const DIST_JITTER: i64 = 5;

#[derive(Debug)]
struct MockProfile {
    name: &'static str,
    temperature: f64,
    distance: i64,
    log_lines: &'static [&'static str],
}

const PROFILES: &[MockProfile] = &[
    MockProfile {
        name: "PATROL",
        temperature: 48.5,
        distance: 340,
        log_lines: &["[SYS] PATROL_ACTIVE", "[NAV] PATH_OPTIMIZED"],
    },
    MockProfile {
        name: "ALARM",
        temperature: 62.1,
        distance: 45,
        log_lines: &["[CRT] OBSTACLE_DETECTED", "[CRT] EMERGENCY_STOP"],
    },
    MockProfile {
        name: "DOCKING",
        temperature: 42.0,
        distance: 120,
        log_lines: &["[SYS] DOCKING_INIT", "[NAV] ALIGNING_BEACON"],
    },
];

pub struct MockSource {
    tick: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    fn active_profile(&self) -> &'static MockProfile {
        &PROFILES[((self.tick / PROFILE_WINDOW) as usize) % PROFILES.len()]
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySource for MockSource {
    fn regime(&self) -> Regime {
        Regime::Mock
    }

    async fn refresh(&mut self, _previous: &StatusRecord) -> SourceReading {
        let profile = self.active_profile();
        // Log lines and the mode label are emitted once per window; within
        // the window an operator-driven mode switch stays visible.
        let window_start = self.tick % PROFILE_WINDOW == 0;
        let mut rng = rand::rng();

        let reading = SourceReading {
            temperature: TempReading::Celsius(
                profile.temperature + rng.random_range(-TEMP_JITTER..=TEMP_JITTER),
            ),
            distance: profile.distance + rng.random_range(-DIST_JITTER..=DIST_JITTER),
            mode: window_start.then(|| profile.name.to_string()),
            linked: true,
            link_status: MOCK_LINK_LABEL.to_string(),
            log_lines: if window_start {
                profile.log_lines.iter().map(|s| s.to_string()).collect()
            } else {
                Vec::new()
            },
            log_view: MOCK_LOG_VIEW,
        };

        self.tick += 1;
        reading
    }
}
