//! Error taxonomy for the conversation client

use crate::assistants::RunStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Bad or missing credential. Fatal: no remote call can succeed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A single remote call failed. Surfaced to the caller, never retried.
    #[error("assistants API error: {0}")]
    Service(String),

    /// The run reached a terminal status other than `completed`.
    #[error("run ended with terminal status {status:?}")]
    RunFailed { status: RunStatus },

    /// More history was requested than the session has cached.
    #[error("requested {requested} messages but only {available} are cached")]
    Index { requested: usize, available: usize },

    /// The configured poll budget ran out before the run went terminal.
    /// Only reachable when `max_polls` is set; the default polls forever.
    #[error("run still pending after {polls} polls")]
    Timeout { polls: u32 },

    /// Appending to the durable thread-id log failed.
    #[error("thread log write failed: {0}")]
    ThreadLog(#[from] std::io::Error),
}

impl ChatError {
    /// True for errors that end the process rather than the turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChatError::Auth(_))
    }
}
