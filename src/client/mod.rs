//! Upstream service clients
//!
//! The rule store and the link service are reached over HTTP. Both sit
//! behind small traits so the resolver can be driven by in-memory fakes.

pub mod http;
pub mod redirect_client;
pub mod rules_client;

use async_trait::async_trait;

use crate::errors::Result;
use crate::rules::RawRule;

pub use redirect_client::{HttpDestinationResolver, parse_destination_body};
pub use rules_client::{HttpRuleSource, parse_rules_body};

/// Source of the rule set attached to a short code
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// An empty list is a valid answer. Errors mean the service could not
    /// be asked or did not answer sensibly.
    async fn fetch_rules(&self, code: &str) -> Result<Vec<RawRule>>;
}

/// Canonical destination of a short code
#[async_trait]
pub trait DestinationResolver: Send + Sync {
    async fn resolve_destination(&self, code: &str) -> Result<String>;
}
