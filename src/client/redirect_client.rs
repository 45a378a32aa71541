//! Default-redirect lookup
//!
//! Asks the link service where a short code points when no rule decided
//! otherwise.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};
use ureq::Agent;

use super::DestinationResolver;
use super::http::{FetchError, build_agent, expand_code_url, get_json};
use crate::config::UpstreamConfig;
use crate::errors::{LinkgateError, Result};
use crate::services::session::Session;

pub struct HttpDestinationResolver {
    agent: Agent,
    url_template: String,
    session: watch::Receiver<Session>,
}

impl HttpDestinationResolver {
    pub fn new(config: &UpstreamConfig, session: watch::Receiver<Session>) -> Self {
        Self {
            agent: build_agent(config.timeout_secs),
            url_template: config.redirect_url.clone(),
            session,
        }
    }
}

#[async_trait]
impl DestinationResolver for HttpDestinationResolver {
    async fn resolve_destination(&self, code: &str) -> Result<String> {
        let url = expand_code_url(&self.url_template, code);

        let body = get_json(&self.agent, url, &self.session)
            .await
            .map_err(|e| match e {
                FetchError::Status(404) => {
                    debug!("Link service does not know {}", code);
                    LinkgateError::destination_not_found(format!("no destination for '{}'", code))
                }
                other => {
                    warn!("Destination lookup for {} failed: {}", code, other);
                    LinkgateError::destination_fetch(other.to_string())
                }
            })?;

        parse_destination_body(&body).ok_or_else(|| {
            LinkgateError::destination_not_found(format!("no destination for '{}'", code))
        })
    }
}

/// Pull the destination out of `{destination}` or `{data: {destination}}`.
///
/// Blank destinations count as missing.
pub fn parse_destination_body(body: &Value) -> Option<String> {
    body.get("destination")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/data/destination").and_then(Value::as_str))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_destination_shapes() {
        assert_eq!(
            parse_destination_body(&json!({"destination": "https://a.example"})).as_deref(),
            Some("https://a.example")
        );
        assert_eq!(
            parse_destination_body(&json!({"data": {"destination": " https://b.example "}}))
                .as_deref(),
            Some("https://b.example")
        );
    }

    #[test]
    fn test_parse_destination_missing() {
        assert!(parse_destination_body(&json!({})).is_none());
        assert!(parse_destination_body(&json!({"destination": ""})).is_none());
        assert!(parse_destination_body(&json!({"destination": 5})).is_none());
        assert!(parse_destination_body(&json!({"data": null})).is_none());
        assert!(parse_destination_body(&json!([])).is_none());
    }
}
