//! Shared blocking HTTP plumbing for upstream calls
//!
//! ureq is synchronous; callers run it through `spawn_blocking`.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use ureq::Agent;

use crate::services::session::Session;

/// Build an agent with a global per-request timeout.
///
/// Non-2xx statuses come back as `ureq::Error::StatusCode`.
pub fn build_agent(timeout_secs: u64) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
        .build()
        .into()
}

/// Fill the `{code}` placeholder of an upstream URL template.
pub fn expand_code_url(template: &str, code: &str) -> String {
    template.replace("{code}", &urlencoding::encode(code))
}

/// Outcome of a blocking JSON GET
#[derive(Debug)]
pub enum FetchError {
    Status(u16),
    Transport(String),
    Body(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "upstream responded with HTTP {}", code),
            FetchError::Transport(msg) => write!(f, "request failed: {}", msg),
            FetchError::Body(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

/// GET `url` and decode the body as JSON, attaching the bearer token of the
/// current session if there is one.
pub async fn get_json(
    agent: &Agent,
    url: String,
    session: &watch::Receiver<Session>,
) -> Result<Value, FetchError> {
    let agent = agent.clone();
    let token = session.borrow().access_token.clone();

    tokio::task::spawn_blocking(move || {
        let mut request = agent.get(&url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        })?;

        response
            .into_body()
            .read_json::<Value>()
            .map_err(|e| FetchError::Body(e.to_string()))
    })
    .await
    .map_err(|e| FetchError::Transport(format!("blocking task failed: {}", e)))?
}
