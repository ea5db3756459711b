//! Remote Assistants API abstraction
//!
//! Wraps the hosted service's thread/run/message surface behind an
//! object-safe trait so the session logic can be tested against a
//! scripted mock.

mod client;
pub mod testing;
mod types;

pub use client::OpenAiAssistants;
pub use types::{AssistantProfile, ChatMessage, Role, Run, RunStatus};

use crate::error::ChatError;
use async_trait::async_trait;

/// The remote conversation surface: create an assistant and a thread,
/// append messages, drive runs, read history back.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Register an assistant profile. The returned id is immutable for the
    /// lifetime of the session that created it.
    async fn create_assistant(&self, profile: &AssistantProfile) -> Result<String, ChatError>;

    /// Open a fresh thread. The caller must persist the returned id to the
    /// durable thread log before first use.
    async fn create_thread(&self) -> Result<String, ChatError>;

    /// Append a message to the thread. Fails if the thread is unknown or a
    /// run is still active on it.
    async fn post_message(&self, thread_id: &str, role: Role, text: &str)
        -> Result<(), ChatError>;

    /// Begin asynchronous processing of the thread's pending input.
    /// Returns immediately with a `queued` or `in_progress` run.
    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        extra_instructions: Option<&str>,
    ) -> Result<Run, ChatError>;

    /// Fetch the current status of a run. Idempotent and cheap.
    async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError>;

    /// List the thread's messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError>;
}
