//! HTTP handlers for the chat widget

use super::assets::{get_index_html, serve_static};
use super::AppState;
use crate::assistants::ChatMessage;
use crate::error::ChatError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Create the router for the chat widget.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/assets/*path", get(serve_static))
        .route("/api/history", get(get_history))
        .route("/api/chat", post(send_chat))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found. Expected ui/dist/index.html.</h1>".to_string()),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    agent_name: String,
    user_name: String,
    greeting: String,
    /// Oldest first, ready to render top to bottom.
    messages: Vec<ChatMessage>,
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;
    Json(HistoryResponse {
        agent_name: session.config().agent_name.clone(),
        user_name: session.config().user_name.clone(),
        greeting: session.config().greeting.clone(),
        messages: session.full_history(),
    })
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: ChatMessage,
}

/// Run one turn. Synchronous from the widget's point of view: the response
/// arrives only once the remote run is terminal.
async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("message text is empty".to_string()));
    }

    let mut session = state.session.lock().await;
    session.ask(text, None).await?;
    let reply = session.last_message()?;
    Ok(Json(ChatResponse { reply }))
}

async fn get_version() -> &'static str {
    concat!("coach-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

enum AppError {
    BadRequest(String),
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

fn chat_error_status(e: &ChatError) -> StatusCode {
    match e {
        ChatError::Auth(_) => StatusCode::UNAUTHORIZED,
        ChatError::Service(_) | ChatError::RunFailed { .. } => StatusCode::BAD_GATEWAY,
        ChatError::Index { .. } => StatusCode::BAD_REQUEST,
        ChatError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ChatError::ThreadLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Chat(e) => (chat_error_status(&e), e.to_string()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::RunStatus;

    #[test]
    fn test_chat_errors_map_to_http_statuses() {
        assert_eq!(
            chat_error_status(&ChatError::Auth("bad key".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            chat_error_status(&ChatError::Service("boom".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            chat_error_status(&ChatError::RunFailed {
                status: RunStatus::Failed
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            chat_error_status(&ChatError::Index {
                requested: 5,
                available: 0
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            chat_error_status(&ChatError::Timeout { polls: 3 }),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
