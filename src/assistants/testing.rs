//! Scripted mock of the remote API for session tests
//!
//! Mirrors the real service's observable behavior: messages accumulate on a
//! per-mock store, runs report a scripted status sequence, and the listing
//! comes back newest-first.

use super::types::{AssistantProfile, ChatMessage, Role, Run, RunStatus};
use super::AssistantsApi;
use crate::error::ChatError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock remote service with scripted run outcomes.
#[allow(dead_code)]
pub struct MockAssistants {
    /// Assistant reply text handed out per completed run, in order.
    replies: Mutex<VecDeque<String>>,
    /// Statuses a run reports, in order: the first is returned by
    /// `start_run`, the rest by successive `poll_run` calls. When the
    /// script is exhausted the run reports `completed`.
    statuses: Mutex<VecDeque<RunStatus>>,
    /// Thread history, oldest first.
    messages: Mutex<Vec<ChatMessage>>,
    /// Errors handed out by the next `poll_run` calls before any status.
    poll_errors: Mutex<VecDeque<ChatError>>,
    /// Errors handed out by the next `list_messages` calls.
    list_errors: Mutex<VecDeque<ChatError>>,
    poll_calls: Mutex<u32>,
    thread_seq: Mutex<u32>,
    run_seq: Mutex<u32>,
}

#[allow(dead_code)]
impl MockAssistants {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            messages: Mutex::new(Vec::new()),
            poll_errors: Mutex::new(VecDeque::new()),
            list_errors: Mutex::new(VecDeque::new()),
            poll_calls: Mutex::new(0),
            thread_seq: Mutex::new(0),
            run_seq: Mutex::new(0),
        }
    }

    /// Queue the assistant's reply for the next completed run.
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(text.into());
    }

    /// Script the status sequence the next run(s) report.
    pub fn script_statuses(&self, statuses: impl IntoIterator<Item = RunStatus>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    /// Make the next `poll_run` call fail instead of reporting a status.
    pub fn fail_next_poll(&self, error: ChatError) {
        self.poll_errors.lock().unwrap().push_back(error);
    }

    /// Make the next `list_messages` call fail.
    pub fn fail_next_listing(&self, error: ChatError) {
        self.list_errors.lock().unwrap().push_back(error);
    }

    pub fn poll_count(&self) -> u32 {
        *self.poll_calls.lock().unwrap()
    }

    fn next_status(&self) -> RunStatus {
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RunStatus::Completed);
        if status == RunStatus::Completed {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "ok".to_string());
            self.messages.lock().unwrap().push(ChatMessage {
                role: Role::Assistant,
                text: reply,
            });
        }
        status
    }
}

impl Default for MockAssistants {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantsApi for MockAssistants {
    async fn create_assistant(&self, _profile: &AssistantProfile) -> Result<String, ChatError> {
        Ok("asst_mock".to_string())
    }

    async fn create_thread(&self) -> Result<String, ChatError> {
        let mut seq = self.thread_seq.lock().unwrap();
        *seq += 1;
        Ok(format!("thread_{seq}"))
    }

    async fn post_message(
        &self,
        _thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), ChatError> {
        self.messages.lock().unwrap().push(ChatMessage {
            role,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn start_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
        _extra_instructions: Option<&str>,
    ) -> Result<Run, ChatError> {
        let mut seq = self.run_seq.lock().unwrap();
        *seq += 1;
        Ok(Run {
            id: format!("run_{seq}"),
            status: self.next_status(),
        })
    }

    async fn poll_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        *self.poll_calls.lock().unwrap() += 1;
        if let Some(error) = self.poll_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(Run {
            id: run_id.to_string(),
            status: self.next_status(),
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        if let Some(error) = self.list_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        let mut messages = self.messages.lock().unwrap().clone();
        messages.reverse();
        Ok(messages)
    }
}
