//! coach-console - console REPL front-end for the coach chat

use coach_chat::assistants::OpenAiAssistants;
use coach_chat::console::{self, PollDots};
use coach_chat::{ChatConfig, ChatSession};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so the REPL output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "coach_chat=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from_env();
    let client = Arc::new(PollDots::new(Arc::new(OpenAiAssistants::new(
        config.api_key.clone(),
    ))));

    let session = ChatSession::create(client, config).await?;
    console::run(session).await?;

    Ok(())
}
