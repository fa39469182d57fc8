use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Well-known operational labels. The record itself never validates `mode`
/// against these; any string the dispatcher accepts is a valid value.
pub mod modes {
    pub const INITIALIZING: &str = "INITIALIZING";
    pub const HALT: &str = "HALT";
    pub const OFFLINE_SEARCHING: &str = "OFFLINE / SEARCHING";
}

/// Data-source regime, fixed for the process lifetime at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Regime {
    Mock,
    Live,
}

impl Regime {
    /// Parses the label used in configuration and on the wire.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "MOCK" => Some(Regime::Mock),
            "LIVE" => Some(Regime::Live),
            _ => None,
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regime::Mock => write!(f, "MOCK"),
            Regime::Live => write!(f, "LIVE"),
        }
    }
}

/// A temperature sample. `Unavailable` is the sentinel reported while the
/// live link is absent; it serializes as the string `"--"`, a number rounded
/// to one decimal otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TempReading {
    Celsius(f64),
    Unavailable,
}

impl Serialize for TempReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TempReading::Celsius(v) => serializer.serialize_f64((v * 10.0).round() / 10.0),
            TempReading::Unavailable => serializer.serialize_str("--"),
        }
    }
}

/// The single shared snapshot of robot state. Lives for the whole process
/// behind `RobotState`; both the telemetry loop and the command dispatcher
/// mutate it.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub temperature: TempReading,
    pub distance: i64,
    pub mode: String,
    pub regime: Regime,
    pub linked: bool,
    pub started_at: DateTime<Utc>,
    /// Unbounded backing store, most-recent-last. Observers only ever see a
    /// bounded tail of it (`log_view`).
    pub log: Vec<String>,
}

impl StatusRecord {
    pub fn new(regime: Regime) -> Self {
        Self {
            temperature: TempReading::Unavailable,
            distance: 0,
            mode: modes::INITIALIZING.to_string(),
            regime,
            linked: false,
            started_at: Utc::now(),
            log: vec![format!("[SYS] BOOT_SEQUENCE_INIT (MODE: {regime})")],
        }
    }

    /// Elapsed wall-clock time since process start as `HH:MM:SS`.
    pub fn uptime(&self) -> String {
        let secs = (Utc::now() - self.started_at).num_seconds().max(0);
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }

    /// The last `n` log entries, oldest first. Never truncates the backing
    /// store.
    pub fn log_view(&self, n: usize) -> Vec<String> {
        let start = self.log.len().saturating_sub(n);
        self.log[start..].to_vec()
    }
}

/// One refreshed delta produced by a telemetry source per tick.
#[derive(Debug, Clone)]
pub struct SourceReading {
    pub temperature: TempReading,
    pub distance: i64,
    /// A new operational label, when this tick's cycling drives one.
    pub mode: Option<String>,
    pub linked: bool,
    pub link_status: String,
    /// Lines to append to the shared log; duplicates within the trailing
    /// window are suppressed on apply.
    pub log_lines: Vec<String>,
    /// How many backing entries this regime's projection exposes.
    pub log_view: usize,
}

/// The JSON push sent to every observer each loop iteration.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryFrame {
    #[serde(rename = "type")]
    pub kind: String,
    pub regime: Regime,
    pub temperature: TempReading,
    pub uptime: String,
    pub distance: i64,
    pub mode: String,
    #[serde(rename = "linkStatus")]
    pub link_status: String,
    pub log: Vec<String>,
}

pub const FRAME_TYPE: &str = "telemetry";

impl TelemetryFrame {
    pub fn encode(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reply shape for the status query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub linked: bool,
}
