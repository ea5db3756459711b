//! Browser chat adapter
//!
//! One page, one session. The session is created at startup and lives in
//! shared state, so a page reload re-renders the existing thread instead of
//! opening a new one.

mod assets;
mod handlers;

pub use handlers::create_router;

use crate::session::ChatSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single active conversation session. The mutex also enforces the
    /// one-turn-at-a-time rule when several browser tabs point at the page.
    pub session: Arc<Mutex<ChatSession>>,
}

impl AppState {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
