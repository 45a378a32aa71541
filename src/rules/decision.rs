//! Decision types for rule evaluation.

use serde::Serialize;

/// Reason attached to every block decision
pub const BLOCK_REASON: &str = "blocked by rule";

/// Shown when a message rule carries no text of its own
pub const DEFAULT_MESSAGE: &str = "Custom message for your access.";

/// Served when a landing-page rule carries no markup of its own
pub const DEFAULT_LANDING_HTML: &str = "<div><b>Custom landing</b></div>";

/// The single outcome of evaluating a rule set against a request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// A rule sent the visitor somewhere specific.
    Redirect { destination: String },
    /// Access refused; nothing is navigated to.
    Block { reason: String },
    /// Visitor must pass a human check first. No payload is kept from the
    /// rule that asked for it.
    Challenge,
    /// Show text instead of redirecting.
    Message { text: String },
    /// Show a full page of markup instead of redirecting.
    Landing { html: String },
    /// No rule had anything to say: look up the link's own destination.
    DefaultRedirect,
}

impl Decision {
    /// Lowercase label for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Redirect { .. } => "redirect",
            Decision::Block { .. } => "block",
            Decision::Challenge => "challenge",
            Decision::Message { .. } => "message",
            Decision::Landing { .. } => "landing",
            Decision::DefaultRedirect => "default_redirect",
        }
    }

    pub fn block() -> Self {
        Decision::Block {
            reason: BLOCK_REASON.to_string(),
        }
    }
}
