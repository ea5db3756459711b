//! OpenAI Assistants API v2 client implementation

use super::types::{AssistantProfile, ChatMessage, Role, Run};
use super::AssistantsApi;
use crate::error::ChatError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Assistants API client over HTTP.
pub struct OpenAiAssistants {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiAssistants {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint (gateways, test servers).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The credential is only required once a call actually goes out.
    fn bearer(&self) -> Result<&str, ChatError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ChatError::Auth("OPENAI_API_KEY is not set".to_string()))
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ChatError> {
        Ok(builder
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .header("OpenAI-Beta", "assistants=v2")
            .header("Content-Type", "application/json"))
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ChatError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Service(format!("request timeout: {e}"))
            } else if e.is_connect() {
                ChatError::Service(format!("connection failed: {e}"))
            } else {
                ChatError::Service(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Service(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or_else(|_| body.clone(), |resp| resp.error.message);
            return Err(match status.as_u16() {
                401 | 403 => ChatError::Auth(message),
                _ => ChatError::Service(format!("HTTP {status}: {message}")),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ChatError::Service(format!("failed to parse response: {e} - body: {body}")))
    }
}

#[async_trait]
impl AssistantsApi for OpenAiAssistants {
    async fn create_assistant(&self, profile: &AssistantProfile) -> Result<String, ChatError> {
        let url = format!("{}/assistants", self.base_url);
        let builder = self.authed(self.client.post(&url))?.json(profile);
        let created: ObjectWithId = self.send(builder).await?;
        tracing::info!(assistant_id = %created.id, model = %profile.model, "Assistant created");
        Ok(created.id)
    }

    async fn create_thread(&self) -> Result<String, ChatError> {
        let url = format!("{}/threads", self.base_url);
        let builder = self
            .authed(self.client.post(&url))?
            .json(&serde_json::json!({}));
        let created: ObjectWithId = self.send(builder).await?;
        tracing::info!(thread_id = %created.id, "Thread created");
        Ok(created.id)
    }

    async fn post_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), ChatError> {
        let url = format!("{}/threads/{thread_id}/messages", self.base_url);
        let builder = self
            .authed(self.client.post(&url))?
            .json(&CreateMessageRequest { role, content: text });
        let _: ObjectWithId = self.send(builder).await?;
        Ok(())
    }

    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        extra_instructions: Option<&str>,
    ) -> Result<Run, ChatError> {
        let url = format!("{}/threads/{thread_id}/runs", self.base_url);
        let builder = self.authed(self.client.post(&url))?.json(&CreateRunRequest {
            assistant_id,
            instructions: extra_instructions,
        });
        let run: Run = self.send(builder).await?;
        tracing::debug!(run_id = %run.id, status = ?run.status, "Run started");
        Ok(run)
    }

    async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        let url = format!("{}/threads/{thread_id}/runs/{run_id}", self.base_url);
        let builder = self.authed(self.client.get(&url))?;
        self.send(builder).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let url = format!("{}/threads/{thread_id}/messages", self.base_url);
        let builder = self.authed(self.client.get(&url))?;
        let listing: ListMessagesResponse = self.send(builder).await?;
        Ok(listing.data.into_iter().map(MessageObject::flatten).collect())
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct ObjectWithId {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ListMessagesResponse {
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    role: Role,
    content: Vec<ContentPart>,
}

impl MessageObject {
    /// Collapse the content-block list into one string: text blocks joined
    /// with newlines, non-text blocks skipped.
    fn flatten(self) -> ChatMessage {
        let text = self
            .content
            .into_iter()
            .filter_map(|part| part.text.map(|t| t.value))
            .collect::<Vec<_>>()
            .join("\n");
        ChatMessage {
            role: self.role,
            text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
