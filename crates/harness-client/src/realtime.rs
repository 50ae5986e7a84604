//! Real-time Events
//!
//! Execution and stage status pushes. Frames arrive as
//! `{"event": "<name>", "data": {...}}`; unknown names are ignored.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ClientResult;
use crate::models::{flexible_id, ExecutionId, ExecutionStatus};

pub const EXECUTION_UPDATE: &str = "execution_update";
pub const STAGE_UPDATE: &str = "stage_update";
/// Outbound: subscribe to one execution's updates
pub const JOIN_EXECUTION: &str = "join_execution";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionUpdate {
    #[serde(deserialize_with = "flexible_id")]
    pub execution_id: ExecutionId,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageUpdate {
    #[serde(deserialize_with = "flexible_id")]
    pub execution_id: ExecutionId,
    pub stage_name: String,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    Execution(ExecutionUpdate),
    Stage(StageUpdate),
}

#[derive(Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl RealtimeEvent {
    pub fn execution_id(&self) -> ExecutionId {
        match self {
            RealtimeEvent::Execution(update) => update.execution_id,
            RealtimeEvent::Stage(update) => update.execution_id,
        }
    }

    /// Decode a named event payload. `Ok(None)` for names we do not handle.
    pub fn from_parts(event: &str, data: Value) -> ClientResult<Option<Self>> {
        let decoded = match event {
            EXECUTION_UPDATE => Some(RealtimeEvent::Execution(serde_json::from_value(data)?)),
            STAGE_UPDATE => Some(RealtimeEvent::Stage(serde_json::from_value(data)?)),
            other => {
                log::debug!("Ignoring realtime event {}", other);
                None
            }
        };
        Ok(decoded)
    }

    /// Decode a whole text frame
    pub fn from_frame(text: &str) -> ClientResult<Option<Self>> {
        let frame: Frame = serde_json::from_str(text)?;
        Self::from_parts(&frame.event, frame.data)
    }
}

/// Frame asking the server to stream updates for `execution_id`
pub fn join_frame(execution_id: ExecutionId) -> String {
    json!({"event": JOIN_EXECUTION, "data": {"execution_id": execution_id}}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_execution_update() {
        let event = RealtimeEvent::from_frame(
            r#"{"event":"execution_update","data":{"execution_id":"7","status":"running"}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            event,
            RealtimeEvent::Execution(ExecutionUpdate {
                execution_id: 7,
                status: ExecutionStatus::Running
            })
        );
    }

    #[test]
    fn decodes_stage_update() {
        let event = RealtimeEvent::from_parts(
            STAGE_UPDATE,
            json!({"execution_id": 7, "stage_name": "Build", "status": "success"}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.execution_id(), 7);
    }

    #[test]
    fn ignores_unknown_events() {
        assert_eq!(RealtimeEvent::from_parts("heartbeat", Value::Null).unwrap(), None);
    }

    #[test]
    fn join_frame_names_execution() {
        let frame: Value = serde_json::from_str(&join_frame(12)).unwrap();
        assert_eq!(frame["event"], "join_execution");
        assert_eq!(frame["data"]["execution_id"], 12);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(RealtimeEvent::from_parts(EXECUTION_UPDATE, json!({"status": 3})).is_err());
    }
}
