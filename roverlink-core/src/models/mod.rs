// File: roverlink-core/src/models/mod.rs
pub mod command;
pub mod status;

pub use command::{CommandAck, CommandRequest};
pub use status::{
    Regime, SourceReading, StatusRecord, StatusResponse, TelemetryFrame, TempReading,
};
