//! Rule Store Client
//!
//! Fetches the rule set configured for a short code. Rules are fetched
//! fresh for every resolution attempt.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::RuleSource;
use super::http::{build_agent, expand_code_url, get_json};
use crate::config::UpstreamConfig;
use crate::errors::{LinkgateError, Result};
use crate::rules::RawRule;
use crate::services::session::Session;

pub struct HttpRuleSource {
    agent: Agent,
    url_template: String,
    session: watch::Receiver<Session>,
}

impl HttpRuleSource {
    pub fn new(config: &UpstreamConfig, session: watch::Receiver<Session>) -> Self {
        Self {
            agent: build_agent(config.timeout_secs),
            url_template: config.rules_url.clone(),
            session,
        }
    }
}

#[async_trait]
impl RuleSource for HttpRuleSource {
    async fn fetch_rules(&self, code: &str) -> Result<Vec<RawRule>> {
        let url = expand_code_url(&self.url_template, code);
        trace!("Fetching rules for {} from {}", code, url);

        let body = get_json(&self.agent, url, &self.session)
            .await
            .map_err(|e| {
                warn!("Rules lookup for {} failed: {}", code, e);
                LinkgateError::rules_fetch(e.to_string())
            })?;

        let rules = parse_rules_body(body);
        debug!("Rules service returned {} rule(s) for {}", rules.len(), code);
        Ok(rules)
    }
}

/// Extract rules from whatever envelope the rules service used.
///
/// Accepts a bare array, `{"rules": [...]}`, `{"data": [...]}` or
/// `{"data": {"rules": [...]}}`. Anything else means "no rules". Array
/// entries that aren't rule objects are skipped.
pub fn parse_rules_body(body: Value) -> Vec<RawRule> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let inner = map
                .remove("rules")
                .filter(|v| !v.is_null())
                .or_else(|| map.remove("data"));
            match inner {
                Some(Value::Array(items)) => items,
                Some(Value::Object(mut data)) => match data.remove("rules") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawRule>(item) {
            Ok(rule) => Some(rule),
            Err(e) => {
                debug!("Skipping malformed rule entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule_json(id: &str) -> Value {
        json!({"id": id, "conditionType": "country", "conditionValue": "MX", "actionType": "block", "priority": 1})
    }

    #[test]
    fn test_bare_array() {
        let rules = parse_rules_body(json!([rule_json("a"), rule_json("b")]));
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_rules_envelope() {
        let rules = parse_rules_body(json!({"rules": [rule_json("a")]}));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_data_envelope() {
        assert_eq!(parse_rules_body(json!({"data": [rule_json("a")]})).len(), 1);
        assert_eq!(
            parse_rules_body(json!({"data": {"rules": [rule_json("a")]}})).len(),
            1
        );
        assert_eq!(
            parse_rules_body(json!({"rules": null, "data": [rule_json("a")]})).len(),
            1
        );
    }

    #[test]
    fn test_absent_or_odd_bodies_mean_no_rules() {
        assert!(parse_rules_body(json!({})).is_empty());
        assert!(parse_rules_body(json!({"rules": []})).is_empty());
        assert!(parse_rules_body(json!({"rules": "nope"})).is_empty());
        assert!(parse_rules_body(json!("text")).is_empty());
        assert!(parse_rules_body(Value::Null).is_empty());
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let rules = parse_rules_body(json!([rule_json("a"), "junk", 7, rule_json("b")]));
        let ids: Vec<_> = rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
