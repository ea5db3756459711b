//! coach-chat - a thin client for the OpenAI Assistants API
//!
//! Drives one persistent remote conversation thread: post a user message,
//! start a run, poll it to completion, read back the message history.
//! Two front-ends consume the same session: a console REPL and a browser
//! chat widget.

pub mod assistants;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod web;

pub use config::ChatConfig;
pub use error::ChatError;
pub use session::{ChatSession, SessionState};
