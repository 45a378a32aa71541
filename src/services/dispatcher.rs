//! Decision → Outcome
//!
//! The dispatcher is the only place a decision turns into something the
//! visitor sees. Failures never navigate anywhere.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use super::challenge_store::{ChallengeStore, ChallengeSubmission, IssuedChallenge};
use crate::client::DestinationResolver;
use crate::errors::LinkgateError;
use crate::rules::Decision;

/// User-visible text of every failed resolution
pub const UNABLE_TO_RESOLVE: &str = "Unable to resolve link";

/// Inline note when a challenge id is no longer known
pub const CHALLENGE_EXPIRED_MESSAGE: &str = "That check expired. Please answer this one.";

/// Pages rendered in place of a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Render {
    Blocked {
        reason: String,
    },
    Message {
        text: String,
    },
    Landing {
        html: String,
    },
    Challenge {
        challenge_id: String,
        prompt: String,
        error: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The link service does not know the code
    NotFound,
    /// An upstream service failed or answered nonsense
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Navigate { url: String },
    Render(Render),
    Failed { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn failure(err: &LinkgateError) -> Self {
        let kind = if err.is_not_found() {
            FailureKind::NotFound
        } else {
            FailureKind::Upstream
        };
        Outcome::Failed {
            kind,
            message: UNABLE_TO_RESOLVE.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Navigate { .. } => "navigate",
            Outcome::Render(_) => "render",
            Outcome::Failed { .. } => "failed",
        }
    }

    fn challenge(issued: IssuedChallenge, error: Option<&str>) -> Self {
        Outcome::Render(Render::Challenge {
            challenge_id: issued.id,
            prompt: issued.prompt,
            error: error.map(String::from),
        })
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    destinations: Arc<dyn DestinationResolver>,
    challenges: ChallengeStore,
}

impl Dispatcher {
    pub fn new(destinations: Arc<dyn DestinationResolver>, challenges: ChallengeStore) -> Self {
        Self {
            destinations,
            challenges,
        }
    }

    pub fn challenges(&self) -> &ChallengeStore {
        &self.challenges
    }

    pub async fn dispatch(&self, code: &str, decision: Decision) -> Outcome {
        match decision {
            Decision::Redirect { destination } => Outcome::Navigate { url: destination },
            Decision::DefaultRedirect => self.default_redirect(code).await,
            Decision::Block { reason } => Outcome::Render(Render::Blocked { reason }),
            Decision::Challenge => Outcome::challenge(self.challenges.issue(code).await, None),
            Decision::Message { text } => Outcome::Render(Render::Message { text }),
            Decision::Landing { html } => Outcome::Render(Render::Landing { html }),
        }
    }

    /// Look up the code's own destination. Also the only path out of a
    /// passed challenge.
    pub async fn default_redirect(&self, code: &str) -> Outcome {
        match self.destinations.resolve_destination(code).await {
            Ok(url) => Outcome::Navigate { url },
            Err(e) => {
                if e.is_not_found() {
                    debug!("No destination for {}: {}", code, e);
                } else {
                    error!("Default redirect for {} failed: {}", code, e);
                }
                Outcome::failure(&e)
            }
        }
    }

    /// Handle an answer posted from a challenge page.
    pub async fn submit_challenge(&self, code: &str, challenge_id: &str, answer: &str) -> Outcome {
        match self.challenges.submit(challenge_id, code, answer).await {
            ChallengeSubmission::Verified => {
                debug!("Challenge passed for {}", code);
                self.default_redirect(code).await
            }
            ChallengeSubmission::Incorrect(issued) => Outcome::challenge(
                issued,
                Some(super::challenge::WRONG_ANSWER_MESSAGE),
            ),
            ChallengeSubmission::Unknown => {
                warn!("Unknown or expired challenge {} for {}", challenge_id, code);
                Outcome::challenge(
                    self.challenges.issue(code).await,
                    Some(CHALLENGE_EXPIRED_MESSAGE),
                )
            }
        }
    }
}
