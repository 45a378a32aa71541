//! One resolution attempt, end to end
//!
//! code → (context ∥ rules) → decision → outcome.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use super::dispatcher::{Dispatcher, Outcome};
use crate::client::RuleSource;
use crate::context::{ClientRequest, ContextCollector, RequestContext};
use crate::errors::{LinkgateError, Result};
use crate::rules::{Decision, explain, normalize_rules};
use crate::utils::is_valid_short_code;

/// Everything known once the rules have been evaluated
#[derive(Debug, Clone)]
pub struct Decided {
    pub context: RequestContext,
    pub decision: Decision,
    /// Id (or label) of the rule that decided; `None` for the default path
    pub matched_rule: Option<String>,
    pub rules_considered: usize,
}

#[derive(Clone)]
pub struct Resolver {
    collector: ContextCollector,
    rules: Arc<dyn RuleSource>,
    dispatcher: Dispatcher,
}

impl Resolver {
    pub fn new(collector: ContextCollector, rules: Arc<dyn RuleSource>, dispatcher: Dispatcher) -> Self {
        Self {
            collector,
            rules,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Gather context and rules concurrently, then evaluate.
    pub async fn decide(&self, code: &str, request: &ClientRequest) -> Result<Decided> {
        if !is_valid_short_code(code) {
            return Err(LinkgateError::invalid_short_code(code));
        }

        let (context, rules) = tokio::join!(
            self.collector.collect(code, request),
            self.rules.fetch_rules(code)
        );
        let rules = normalize_rules(rules?);

        let evaluation = explain(&rules, &context);
        let matched_rule = evaluation.matched.map(|r| r.label());
        debug!(
            "Decision for {}: {} (rule: {:?}, {} rules)",
            code,
            evaluation.decision.kind(),
            matched_rule,
            rules.len()
        );

        Ok(Decided {
            decision: evaluation.decision,
            matched_rule,
            rules_considered: rules.len(),
            context,
        })
    }

    pub async fn resolve(&self, code: &str, request: &ClientRequest) -> Outcome {
        match self.decide(code, request).await {
            Ok(decided) => self.dispatcher.dispatch(code, decided.decision).await,
            Err(e) => Outcome::failure(&e),
        }
    }

    /// `resolve`, abandoned as soon as `teardown` completes. Returns `None`
    /// if it was abandoned; nothing is dispatched in that case.
    pub async fn resolve_until<F>(
        &self,
        code: &str,
        request: &ClientRequest,
        teardown: F,
    ) -> Option<Outcome>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = teardown => {
                info!("Resolution of {} cancelled", code);
                None
            }
            outcome = self.resolve(code, request) => Some(outcome),
        }
    }

    /// Answer to a challenge page. Never re-runs rule evaluation.
    pub async fn complete_challenge(&self, code: &str, challenge_id: &str, answer: &str) -> Outcome {
        if !is_valid_short_code(code) {
            return Outcome::failure(&LinkgateError::invalid_short_code(code));
        }
        self.dispatcher
            .submit_challenge(code, challenge_id, answer)
            .await
    }
}
