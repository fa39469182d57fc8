// File: src/sources/mod.rs
//
// The two data-source regimes behind one refresh contract. The telemetry
// loop stays regime-agnostic; a hardware-backed source can be substituted
// without touching broadcast or command logic.

use async_trait::async_trait;

use crate::models::{Regime, SourceReading, StatusRecord};

#[async_trait]
pub trait TelemetrySource: Send {
    fn regime(&self) -> Regime;

    /// Produces one refreshed reading. Infallible by contract: a real link
    /// implementation must absorb an absent or unresponsive link into the
    /// offline projection instead of failing the tick.
    async fn refresh(&mut self, previous: &StatusRecord) -> SourceReading;
}

pub mod live;
pub mod mock;

pub use live::LiveSource;
pub use mock::MockSource;
