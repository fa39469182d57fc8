//! src/sources/live.rs

use async_trait::async_trait;

use super::TelemetrySource;
use crate::models::status::modes;
use crate::models::{Regime, SourceReading, StatusRecord, TempReading};

/// Entries of the backing log exposed in the offline projection.
pub const LIVE_LOG_VIEW: usize = 5;

pub const SEARCHING_LINK_LABEL: &str = "SEARCHING_LINK";

/// Placeholder live-regime source. With no physical link wired in it always
/// reports the offline/searching projection; a real link implementation must
/// keep this exact fallback whenever the link is absent or unresponsive.
pub struct LiveSource;

impl LiveSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LiveSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySource for LiveSource {
    fn regime(&self) -> Regime {
        Regime::Live
    }

    async fn refresh(&mut self, _previous: &StatusRecord) -> SourceReading {
        SourceReading {
            temperature: TempReading::Unavailable,
            distance: 0,
            mode: Some(modes::OFFLINE_SEARCHING.to_string()),
            linked: false,
            link_status: SEARCHING_LINK_LABEL.to_string(),
            log_lines: Vec::new(),
            log_view: LIVE_LOG_VIEW,
        }
    }
}
