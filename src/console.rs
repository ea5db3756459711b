//! Console REPL adapter
//!
//! Presentation only: banners, the input prompt, and progress dots while a
//! run is polled. The session itself knows nothing about verbosity.

use crate::assistants::{AssistantProfile, AssistantsApi, ChatMessage, Role, Run};
use crate::error::ChatError;
use crate::session::ChatSession;
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::Arc;

const BANNER: &str = "==========";

/// Decorator that prints one progress mark per run poll, so the user sees
/// the turn advancing while `ask` blocks.
pub struct PollDots {
    inner: Arc<dyn AssistantsApi>,
}

impl PollDots {
    pub fn new(inner: Arc<dyn AssistantsApi>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AssistantsApi for PollDots {
    async fn create_assistant(&self, profile: &AssistantProfile) -> Result<String, ChatError> {
        self.inner.create_assistant(profile).await
    }

    async fn create_thread(&self) -> Result<String, ChatError> {
        self.inner.create_thread().await
    }

    async fn post_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), ChatError> {
        self.inner.post_message(thread_id, role, text).await
    }

    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        extra_instructions: Option<&str>,
    ) -> Result<Run, ChatError> {
        self.inner
            .start_run(thread_id, assistant_id, extra_instructions)
            .await
    }

    async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        print!("=");
        let _ = std::io::stdout().flush();
        self.inner.poll_run(thread_id, run_id).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        self.inner.list_messages(thread_id).await
    }
}

/// Read-ask-print loop. Runs until stdin closes or the process is
/// interrupted; only a fatal error ends it early.
pub async fn run(mut session: ChatSession) -> Result<(), ChatError> {
    let agent_name = session.config().agent_name.clone();
    let user_name = session.config().user_name.clone();

    println!("{BANNER} {agent_name} ) {BANNER}");
    println!("{}", session.config().greeting);

    let stdin = std::io::stdin();
    loop {
        println!();
        println!("{BANNER} {user_name} ) {BANNER}");
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            // EOF: the surrounding terminal is gone.
            return Ok(());
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        println!();
        print!("{BANNER} {agent_name} ) ");
        let _ = std::io::stdout().flush();

        match session.ask(text, None).await {
            Ok(()) => {
                println!();
                match session.last_message() {
                    Ok(reply) => println!("{}", reply.text),
                    Err(e) => println!("(no reply: {e})"),
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                // Turn failed; the session is Idle or Failed and the next
                // line of input starts a fresh run.
                println!();
                println!("error: {e}");
            }
        }
    }
}
