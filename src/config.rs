//! Environment-driven configuration and persona defaults

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_THREAD_LOG: &str = ".thread_ids.txt";

pub const DEFAULT_AGENT_NAME: &str = "AIda";
pub const DEFAULT_USER_NAME: &str = "Participant";

pub const DEFAULT_GREETING: &str =
    "Hello. I am AIda your AI Coach for today. May I know your name.";

pub const DEFAULT_INSTRUCTIONS: &str = "\
You are an experienced workplace coach facilitating a brainstorm session \
among members of the digital team of a major UK bank.

During the session you will:

- Encourage open and honest dialogue among participants.
- Help participants to generate a wide range of ideas.
- Keep the discussion focused on the topic at hand.
- Help participants to identify the most promising ideas.
- Develop an action plan for moving forward.

The main questions you will pose to the participants are:

1. What would you most like to improve about the way you or your team work today?
2. What would that improvement look like?
3. If that was improved, what would you or your team be able to accomplish?
4. What do you think is stopping it from being improved?
5. How big an impact would that have on the bank's staff? And customers?

Ask around the same topic two or three times so participants go deeper in \
their thoughts. Do not ask all questions at once; carry out a fluid dialogue \
and go around the questions one at a time. Keep your answers within one or \
two sentences and keep the conversation natural and direct.";

/// Runtime configuration for a conversation session and its front-ends.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API key for the hosted service. Optional here; its absence surfaces
    /// as an auth error at the first remote call.
    pub api_key: Option<String>,
    pub model: String,
    pub agent_name: String,
    pub agent_instructions: Option<String>,
    pub user_name: String,
    pub greeting: String,
    /// Fixed interval between run polls.
    pub poll_interval: Duration,
    /// Optional cap on poll attempts per turn. `None` polls forever.
    pub max_polls: Option<u32>,
    /// Append-only audit log of thread identifiers, one per line.
    pub thread_log_path: String,
    /// Listen port for the web front-end.
    pub port: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            agent_instructions: Some(DEFAULT_INSTRUCTIONS.to_string()),
            user_name: DEFAULT_USER_NAME.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            poll_interval: Duration::from_secs(1),
            max_polls: None,
            thread_log_path: DEFAULT_THREAD_LOG.to_string(),
            port: 8000,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("COACH_MODEL").unwrap_or(defaults.model),
            agent_name: std::env::var("COACH_AGENT_NAME").unwrap_or(defaults.agent_name),
            agent_instructions: std::env::var("COACH_INSTRUCTIONS")
                .ok()
                .or(defaults.agent_instructions),
            user_name: std::env::var("COACH_USER_NAME").unwrap_or(defaults.user_name),
            greeting: std::env::var("COACH_GREETING").unwrap_or(defaults.greeting),
            poll_interval: std::env::var("COACH_POLL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.poll_interval, Duration::from_millis),
            max_polls: std::env::var("COACH_MAX_POLLS")
                .ok()
                .and_then(|v| v.parse().ok()),
            thread_log_path: std::env::var("COACH_THREAD_LOG").unwrap_or(defaults.thread_log_path),
            port: std::env::var("COACH_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}
