//! src/services/command.rs
//!
//! Operator command dispatch. Mutates the shared status record outside the
//! telemetry loop's own write path; every well-formed command is acked.

use tracing::{debug, info};

use crate::models::command::actions;
use crate::models::status::modes;
use crate::models::{CommandAck, CommandRequest};
use crate::state::RobotState;

pub struct CommandService {
    state: RobotState,
}

impl CommandService {
    pub fn new(state: RobotState) -> Self {
        Self { state }
    }

    /// Applies one command and returns its acknowledgment. Unrecognized
    /// actions are accepted with no state change.
    pub async fn handle(&self, cmd: CommandRequest) -> CommandAck {
        info!("Received command: {} -> {:?}", cmd.action, cmd.value);

        match cmd.action.as_str() {
            actions::CMD_MODE => {
                let label = cmd.value.clone().unwrap_or_default();
                self.state
                    .set_mode_with_log(&label, format!("[SYS] MODE_SWITCH: {label}"))
                    .await;
            }
            actions::CMD_MOVE => {
                let value = cmd.value.clone().unwrap_or_default();
                self.state.append_log(format!("[COM] MOVE: {value}")).await;
            }
            actions::CMD_TERMINATE => {
                // A real actuator link would also command zero output here.
                self.state
                    .set_mode_with_log(
                        modes::HALT,
                        "[CRT] EMERGENCY_STOP_ACTIVATED".to_string(),
                    )
                    .await;
            }
            other => {
                debug!("Unrecognized action '{other}' accepted with no effect");
            }
        }

        CommandAck {
            result: "success".to_string(),
            action: cmd.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Regime;

    fn request(action: &str, value: Option<&str>) -> CommandRequest {
        CommandRequest {
            action: action.to_string(),
            value: value.map(String::from),
        }
    }

    fn service() -> (CommandService, RobotState) {
        let state = RobotState::new(Regime::Mock);
        (CommandService::new(state.clone()), state)
    }

    #[tokio::test]
    async fn cmd_mode_sets_label_and_logs_once() {
        let (service, state) = service();
        let baseline = state.snapshot().await.log.len();

        let ack = service.handle(request(actions::CMD_MODE, Some("ALARM"))).await;
        assert_eq!(ack.result, "success");
        assert_eq!(ack.action, "CMD_MODE");

        let record = state.snapshot().await;
        assert_eq!(record.mode, "ALARM");
        assert_eq!(record.log.len(), baseline + 1);
        assert_eq!(record.log.last().unwrap(), "[SYS] MODE_SWITCH: ALARM");
    }

    #[tokio::test]
    async fn cmd_move_logs_without_touching_sensors_or_mode() {
        let (service, state) = service();
        let before = state.snapshot().await;

        service.handle(request(actions::CMD_MOVE, Some("FORWARD"))).await;

        let record = state.snapshot().await;
        assert_eq!(record.mode, before.mode);
        assert_eq!(record.temperature, before.temperature);
        assert_eq!(record.distance, before.distance);
        assert_eq!(record.log.last().unwrap(), "[COM] MOVE: FORWARD");
    }

    #[tokio::test]
    async fn cmd_terminate_halts_and_is_idempotent() {
        let (service, state) = service();
        let baseline = state.snapshot().await.log.len();

        service.handle(request(actions::CMD_TERMINATE, None)).await;
        service.handle(request(actions::CMD_TERMINATE, None)).await;

        let record = state.snapshot().await;
        assert_eq!(record.mode, modes::HALT);
        // One log append per invocation, no other side effects.
        assert_eq!(record.log.len(), baseline + 2);
        assert_eq!(record.log.last().unwrap(), "[CRT] EMERGENCY_STOP_ACTIVATED");
    }

    #[tokio::test]
    async fn unknown_action_is_acked_with_no_state_change() {
        let (service, state) = service();
        let before = state.snapshot().await;

        let ack = service.handle(request("CMD_SELF_DESTRUCT", Some("now"))).await;
        assert_eq!(ack.result, "success");
        assert_eq!(ack.action, "CMD_SELF_DESTRUCT");

        let record = state.snapshot().await;
        assert_eq!(record.mode, before.mode);
        assert_eq!(record.log.len(), before.log.len());
    }

    #[tokio::test]
    async fn cmd_mode_without_value_sets_empty_label() {
        let (service, state) = service();
        service.handle(request(actions::CMD_MODE, None)).await;
        let record = state.snapshot().await;
        assert_eq!(record.mode, "");
        assert_eq!(record.log.last().unwrap(), "[SYS] MODE_SWITCH: ");
    }
}
