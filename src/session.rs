//! Conversation session: one thread, one assistant, strictly sequential turns
//!
//! A turn moves `Idle -> AwaitingRun -> Idle` on the happy path and
//! `AwaitingRun -> Failed` when the run goes terminal without completing.
//! Turns are sequential by construction: `ask` takes `&mut self` and blocks
//! until the run is terminal, so a second turn cannot start while one is in
//! flight.

use crate::assistants::{AssistantProfile, AssistantsApi, ChatMessage, Role, RunStatus};
use crate::config::ChatConfig;
use crate::error::ChatError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingRun,
    Failed,
}

/// One remote conversation: an assistant profile, a thread, and the cached
/// message history of completed turns.
pub struct ChatSession {
    client: Arc<dyn AssistantsApi>,
    config: ChatConfig,
    assistant_id: String,
    thread_id: String,
    state: SessionState,
    /// Cached history in remote listing order: newest first.
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create the remote assistant and thread, and append the thread id to
    /// the durable log before first use.
    pub async fn create(
        client: Arc<dyn AssistantsApi>,
        config: ChatConfig,
    ) -> Result<Self, ChatError> {
        let profile = AssistantProfile {
            name: config.agent_name.clone(),
            instructions: config.agent_instructions.clone(),
            model: config.model.clone(),
        };
        let assistant_id = client.create_assistant(&profile).await?;
        let thread_id = client.create_thread().await?;
        append_thread_id(&config.thread_log_path, &thread_id)?;

        tracing::info!(%thread_id, %assistant_id, "Session created");

        Ok(Self {
            client,
            config,
            assistant_id,
            thread_id,
            state: SessionState::Idle,
            history: Vec::new(),
        })
    }

    /// Run one full turn: post the user message, start a run, poll it to a
    /// terminal status, then refresh the cached history.
    ///
    /// A failed turn leaves the session `Failed`; the next `ask` simply
    /// starts a fresh run. There is no automatic retry.
    pub async fn ask(
        &mut self,
        text: &str,
        extra_instructions: Option<&str>,
    ) -> Result<(), ChatError> {
        // Errors before the run exists leave the state untouched: the turn
        // never started.
        self.client
            .post_message(&self.thread_id, Role::User, text)
            .await?;
        let mut run = self
            .client
            .start_run(&self.thread_id, &self.assistant_id, extra_instructions)
            .await?;

        self.state = SessionState::AwaitingRun;
        let mut polls: u32 = 0;

        while run.status != RunStatus::Completed {
            if run.status.is_terminal_error() {
                self.state = SessionState::Failed;
                tracing::warn!(run_id = %run.id, status = ?run.status, "Run failed");
                return Err(ChatError::RunFailed { status: run.status });
            }
            if let Some(max) = self.config.max_polls {
                if polls >= max {
                    self.state = SessionState::Failed;
                    return Err(ChatError::Timeout { polls });
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
            run = match self.client.poll_run(&self.thread_id, &run.id).await {
                Ok(run) => run,
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(e);
                }
            };
            polls += 1;
        }

        self.history = match self.client.list_messages(&self.thread_id).await {
            Ok(messages) => messages,
            Err(e) => {
                self.state = SessionState::Failed;
                return Err(e);
            }
        };
        self.state = SessionState::Idle;
        tracing::debug!(run_id = %run.id, polls, "Turn completed");
        Ok(())
    }

    /// The most recent message of the cached history.
    pub fn last_message(&self) -> Result<ChatMessage, ChatError> {
        self.history.first().cloned().ok_or(ChatError::Index {
            requested: 1,
            available: 0,
        })
    }

    /// The `n` most recent messages, oldest of the `n` first.
    pub fn last_n_messages(&self, n: usize) -> Result<Vec<ChatMessage>, ChatError> {
        if n > self.history.len() {
            return Err(ChatError::Index {
                requested: n,
                available: self.history.len(),
            });
        }
        let mut out = self.history[..n].to_vec();
        out.reverse();
        Ok(out)
    }

    /// The whole cached history, oldest first.
    pub fn full_history(&self) -> Vec<ChatMessage> {
        let mut out = self.history.clone();
        out.reverse();
        out
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

/// Append one thread id per line to the audit log. The log is never read
/// back or rewritten by this system.
fn append_thread_id(path: impl AsRef<Path>, thread_id: &str) -> Result<(), ChatError> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    writeln!(log, "{thread_id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::testing::MockAssistants;
    use std::collections::HashSet;
    use std::time::Duration;

    fn test_config(dir: &Path) -> ChatConfig {
        ChatConfig {
            poll_interval: Duration::ZERO,
            thread_log_path: dir.join("threads.txt").to_string_lossy().into_owned(),
            ..ChatConfig::default()
        }
    }

    async fn session_with(mock: Arc<MockAssistants>, dir: &Path) -> ChatSession {
        ChatSession::create(mock, test_config(dir)).await.unwrap()
    }

    #[tokio::test]
    async fn test_hello_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.queue_reply("Hi there");
        let mut session = session_with(mock, dir.path()).await;

        session.ask("Hello", None).await.unwrap();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(
            session.last_message().unwrap(),
            ChatMessage {
                role: Role::Assistant,
                text: "Hi there".to_string()
            }
        );
        assert_eq!(
            session.full_history(),
            vec![
                ChatMessage {
                    role: Role::User,
                    text: "Hello".to_string()
                },
                ChatMessage {
                    role: Role::Assistant,
                    text: "Hi there".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_history_is_chronological_and_alternating() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        for reply in ["first", "second", "third"] {
            mock.queue_reply(reply);
        }
        let mut session = session_with(mock, dir.path()).await;

        session.ask("one", None).await.unwrap();
        session.ask("two", None).await.unwrap();
        session.ask("three", None).await.unwrap();

        let history = session.full_history();
        assert_eq!(history.len(), 6);
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "first", "two", "second", "three", "third"]);
        for (i, message) in history.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(message.role, expected, "message {i} out of turn order");
        }
    }

    #[tokio::test]
    async fn test_last_n_of_one_equals_last_message() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.queue_reply("Hi there");
        let mut session = session_with(mock, dir.path()).await;
        session.ask("Hello", None).await.unwrap();

        assert_eq!(
            session.last_n_messages(1).unwrap(),
            vec![session.last_message().unwrap()]
        );
    }

    #[tokio::test]
    async fn test_last_n_beyond_history_is_an_index_error() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.queue_reply("Hi there");
        let mut session = session_with(mock, dir.path()).await;
        session.ask("Hello", None).await.unwrap();

        let err = session.last_n_messages(3).unwrap_err();
        assert!(matches!(
            err,
            ChatError::Index {
                requested: 3,
                available: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_last_message_on_fresh_session_is_an_index_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(Arc::new(MockAssistants::new()), dir.path()).await;
        assert!(matches!(
            session.last_message().unwrap_err(),
            ChatError::Index { .. }
        ));
    }

    #[tokio::test]
    async fn test_ask_polls_until_the_run_completes() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        // start_run reports queued, then three polls walk the run to completed
        mock.script_statuses([
            RunStatus::Queued,
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::Completed,
        ]);
        mock.queue_reply("done");
        let mut session = session_with(mock.clone(), dir.path()).await;

        session.ask("Hello", None).await.unwrap();

        assert_eq!(mock.poll_count(), 3);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_failed_run_surfaces_and_a_fresh_ask_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.script_statuses([RunStatus::Queued, RunStatus::Failed]);
        let mut session = session_with(mock.clone(), dir.path()).await;

        let err = session.ask("Hello", None).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::RunFailed {
                status: RunStatus::Failed
            }
        ));
        assert_eq!(session.state(), SessionState::Failed);

        // No retry happened on its own; a fresh turn starts a new run.
        mock.queue_reply("recovered");
        session.ask("Hello again", None).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_message().unwrap().text, "recovered");
    }

    #[tokio::test]
    async fn test_poll_error_leaves_session_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.script_statuses([RunStatus::Queued]);
        mock.fail_next_poll(ChatError::Service("boom".to_string()));
        let mut session = session_with(mock, dir.path()).await;

        let err = session.ask("Hello", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Service(_)));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn test_listing_error_leaves_session_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        // The run completes immediately; the history refresh fails.
        mock.fail_next_listing(ChatError::Service("listing unavailable".to_string()));
        let mut session = session_with(mock.clone(), dir.path()).await;

        let err = session.ask("Hello", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Service(_)));
        assert_eq!(session.state(), SessionState::Failed);

        // A fresh turn still works once the service responds again.
        mock.queue_reply("back up");
        session.ask("Hello again", None).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_message().unwrap().text, "back up");
    }

    #[tokio::test]
    async fn test_poll_budget_surfaces_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        mock.script_statuses(std::iter::repeat(RunStatus::Queued).take(10));
        let mut config = test_config(dir.path());
        config.max_polls = Some(2);
        let mut session = ChatSession::create(mock.clone(), config).await.unwrap();

        let err = session.ask("Hello", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Timeout { polls: 2 }));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(mock.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_thread_log_gains_one_distinct_line_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockAssistants::new());
        for _ in 0..3 {
            session_with(mock.clone(), dir.path()).await;
        }

        let log = std::fs::read_to_string(dir.path().join("threads.txt")).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        let distinct: HashSet<&str> = lines.iter().copied().collect();
        assert_eq!(distinct.len(), 3);
    }
}
