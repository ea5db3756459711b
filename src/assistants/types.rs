//! Domain types shared between the client, the session and the adapters

use serde::{Deserialize, Serialize};

/// The named configuration defining the remote agent's behavior.
/// Created once per session; immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a thread's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Run lifecycle states as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    Incomplete,
}

impl RunStatus {
    /// Still being processed; worth polling again.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }

    /// Terminal without producing a response. `requires_action` lands here
    /// because this client exposes no tools for a run to call.
    pub fn is_terminal_error(self) -> bool {
        !self.is_pending() && self != RunStatus::Completed
    }
}

/// One asynchronous processing cycle of the assistant over a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_from_wire_names() {
        let status: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RunStatus::InProgress);
        let status: RunStatus = serde_json::from_str("\"requires_action\"").unwrap();
        assert_eq!(status, RunStatus::RequiresAction);
    }

    #[test]
    fn test_status_classification() {
        assert!(RunStatus::Queued.is_pending());
        assert!(RunStatus::InProgress.is_pending());
        assert!(RunStatus::Cancelling.is_pending());
        assert!(!RunStatus::Completed.is_pending());
        assert!(!RunStatus::Completed.is_terminal_error());
        assert!(RunStatus::Failed.is_terminal_error());
        assert!(RunStatus::Cancelled.is_terminal_error());
        assert!(RunStatus::Expired.is_terminal_error());
        assert!(RunStatus::RequiresAction.is_terminal_error());
    }

    #[test]
    fn test_run_parses_from_wire_object() {
        let run: Run =
            serde_json::from_str(r#"{"id": "run_abc", "status": "queued", "object": "thread.run"}"#)
                .unwrap();
        assert_eq!(run.id, "run_abc");
        assert_eq!(run.status, RunStatus::Queued);
    }
}
