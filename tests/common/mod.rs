//! Shared fakes for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use linkgate::client::{DestinationResolver, RuleSource};
use linkgate::config::ChallengeConfig;
use linkgate::context::{ContextCollector, FixedClock};
use linkgate::errors::{LinkgateError, Result};
use linkgate::rules::RawRule;
use linkgate::services::geoip::{GeoInfo, GeoIpLookup};
use linkgate::services::{ChallengeStore, Dispatcher, Resolver};

pub const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
pub const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Rules served from memory, or a failure
pub struct StaticRules {
    rules: Option<Vec<RawRule>>,
    pub calls: AtomicUsize,
}

impl StaticRules {
    pub fn new(rules: Value) -> Self {
        Self {
            rules: Some(linkgate::client::parse_rules_body(rules)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            rules: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RuleSource for StaticRules {
    async fn fetch_rules(&self, _code: &str) -> Result<Vec<RawRule>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rules
            .clone()
            .ok_or_else(|| LinkgateError::rules_fetch("rules service unavailable"))
    }
}

/// Destination lookup with a call counter
pub struct StaticDestination {
    destination: Option<String>,
    pub calls: AtomicUsize,
}

impl StaticDestination {
    pub fn new(destination: &str) -> Self {
        Self {
            destination: Some(destination.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn missing() -> Self {
        Self {
            destination: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DestinationResolver for StaticDestination {
    async fn resolve_destination(&self, code: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.destination
            .clone()
            .ok_or_else(|| LinkgateError::destination_not_found(format!("unknown code {}", code)))
    }
}

/// Geo lookup that answers every public IP with the same place
pub struct FixedGeo(pub &'static str, pub &'static str);

#[async_trait]
impl GeoIpLookup for FixedGeo {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        Some(GeoInfo {
            country: Some(self.0.to_string()),
            city: Some(self.1.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub fn resolver_with(
    rules: Arc<dyn RuleSource>,
    destinations: Arc<dyn DestinationResolver>,
    geo: Arc<dyn GeoIpLookup>,
    hour: u32,
) -> Resolver {
    let collector = ContextCollector::new(geo, Arc::new(FixedClock(hour)));
    let dispatcher = Dispatcher::new(
        destinations,
        ChallengeStore::new(&ChallengeConfig::default()),
    );
    Resolver::new(collector, rules, dispatcher)
}

pub fn resolver(rules: Value, destination: &str) -> Resolver {
    resolver_with(
        Arc::new(StaticRules::new(rules)),
        Arc::new(StaticDestination::new(destination)),
        Arc::new(FixedGeo("MX", "Monterrey")),
        12,
    )
}

/// Compute the answer of a "a op b" prompt as shown on challenge pages.
pub fn solve(prompt: &str) -> i64 {
    let parts: Vec<&str> = prompt.split_whitespace().collect();
    let left: i64 = parts[0].parse().expect("left operand");
    let right: i64 = parts[2].parse().expect("right operand");
    match parts[1] {
        "+" => left + right,
        "-" => left - right,
        "x" => left * right,
        other => panic!("unexpected operator {}", other),
    }
}
