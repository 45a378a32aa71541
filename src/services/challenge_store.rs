//! Pending challenges for the HTTP surface
//!
//! Each issued challenge lives under a random id, bound to the short code
//! it gates. Entries expire when left alone for `idle_ttl_secs` and the
//! cache is capped at `max_pending`.

use std::ops::RangeInclusive;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use super::challenge::{Challenge, Verification};
use crate::config::ChallengeConfig;

#[derive(Debug, Clone)]
struct PendingChallenge {
    code: String,
    challenge: Challenge,
}

/// What the visitor gets to see for a freshly issued challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedChallenge {
    pub id: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeSubmission {
    /// Correct answer; the challenge is gone
    Verified,
    /// Wrong answer; same id, same question
    Incorrect(IssuedChallenge),
    /// Expired, already used, or issued for another code
    Unknown,
}

#[derive(Clone)]
pub struct ChallengeStore {
    pending: Cache<String, PendingChallenge>,
    operands: RangeInclusive<i64>,
}

impl ChallengeStore {
    pub fn new(config: &ChallengeConfig) -> Self {
        let pending = Cache::builder()
            .max_capacity(config.max_pending)
            .time_to_idle(Duration::from_secs(config.idle_ttl_secs.max(1)))
            .build();

        Self {
            pending,
            operands: config.operand_range(),
        }
    }

    pub async fn issue(&self, code: &str) -> IssuedChallenge {
        self.insert(code, Challenge::generate(self.operands.clone()))
            .await
    }

    /// Store a prepared challenge. Lets callers pick the question.
    pub async fn insert(&self, code: &str, challenge: Challenge) -> IssuedChallenge {
        let id = Uuid::new_v4().to_string();
        let prompt = challenge.question().prompt();
        self.pending
            .insert(
                id.clone(),
                PendingChallenge {
                    code: code.to_string(),
                    challenge,
                },
            )
            .await;
        debug!("Issued challenge {} for {}", id, code);
        IssuedChallenge { id, prompt }
    }

    /// Check an answer. Removing the entry is what makes success count
    /// once: of two concurrent correct answers only the one that actually
    /// removes it is `Verified`.
    pub async fn submit(&self, id: &str, code: &str, answer: &str) -> ChallengeSubmission {
        let Some(mut entry) = self.pending.get(id).await else {
            return ChallengeSubmission::Unknown;
        };
        if entry.code != code {
            debug!("Challenge {} belongs to {}, not {}", id, entry.code, code);
            return ChallengeSubmission::Unknown;
        }

        match entry.challenge.submit(answer) {
            Verification::Accepted => match self.pending.remove(id).await {
                Some(_) => ChallengeSubmission::Verified,
                None => ChallengeSubmission::Unknown,
            },
            Verification::Rejected => ChallengeSubmission::Incorrect(IssuedChallenge {
                id: id.to_string(),
                prompt: entry.challenge.question().prompt(),
            }),
            Verification::AlreadyVerified => ChallengeSubmission::Unknown,
        }
    }

    pub async fn pending_count(&self) -> u64 {
        self.pending.run_pending_tasks().await;
        self.pending.entry_count()
    }
}
