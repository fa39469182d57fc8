pub mod telemetry;

pub use telemetry::spawn_telemetry_task;
