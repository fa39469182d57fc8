use serde::{Deserialize, Serialize};

/// The action labels the dispatcher recognizes. Anything else is accepted
/// and acked without effect.
pub mod actions {
    pub const CMD_MODE: &str = "CMD_MODE";
    pub const CMD_MOVE: &str = "CMD_MOVE";
    pub const CMD_TERMINATE: &str = "CMD_TERMINATE";
}

/// An operator command submitted over the command endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Acknowledgment returned for every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandAck {
    pub result: String,
    pub action: String,
}
