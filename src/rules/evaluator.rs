//! Rule evaluation
//!
//! Pure functions: given the rules of a code and the request context,
//! produce exactly one `Decision`. No I/O happens here.

use tracing::trace;

use super::decision::{DEFAULT_LANDING_HTML, DEFAULT_MESSAGE, Decision};
use super::model::{Action, ConditionType, RawRule, Rule, normalize_rules};
use crate::context::{RequestContext, UNKNOWN};

/// Result of looking at a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Stop(Decision),
    Continue,
}

/// Decision plus the rule that produced it (`None` for the default path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation<'a> {
    pub decision: Decision,
    pub matched: Option<&'a Rule>,
}

/// Whether a rule's condition holds for the context.
///
/// Missing information never matches: an empty rule value, an empty
/// context field and the classifier's `Unknown` all fail.
pub fn matches(rule: &Rule, ctx: &RequestContext) -> bool {
    let expected = rule.condition_value.trim();
    let actual = ctx.field(rule.condition).trim();

    if expected.is_empty() || actual.is_empty() || actual == UNKNOWN {
        return false;
    }

    match rule.condition {
        ConditionType::Hour => format!("{:0>2}", expected) == actual,
        _ => expected.to_lowercase() == actual.to_lowercase(),
    }
}

/// What a matching rule contributes.
pub fn step(rule: &Rule) -> Step {
    match &rule.action {
        Action::Block => Step::Stop(Decision::block()),
        Action::Redirect(value) => match value.as_deref().map(str::trim) {
            Some(dest) if !dest.is_empty() => Step::Stop(Decision::Redirect {
                destination: dest.to_string(),
            }),
            // 没有目标地址的 redirect 规则不终止评估
            _ => Step::Continue,
        },
        Action::Captcha => Step::Stop(Decision::Challenge),
        Action::Message(value) => Step::Stop(Decision::Message {
            text: non_empty_or(value, DEFAULT_MESSAGE),
        }),
        Action::LandingPage(value) => Step::Stop(Decision::Landing {
            html: non_empty_or(value, DEFAULT_LANDING_HTML),
        }),
    }
}

fn non_empty_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Rules in evaluation order: ascending priority, unranked last, ties in
/// input order.
pub fn ordered(rules: &[Rule]) -> Vec<&Rule> {
    let mut sorted: Vec<&Rule> = rules.iter().collect();
    // sort_by_key is stable
    sorted.sort_by_key(|r| r.priority);
    sorted
}

pub fn explain<'a>(rules: &'a [Rule], ctx: &RequestContext) -> Evaluation<'a> {
    ordered(rules)
        .into_iter()
        .find_map(|rule| {
            if !matches(rule, ctx) {
                trace!("Rule {} does not match", rule.label());
                return None;
            }
            match step(rule) {
                Step::Stop(decision) => {
                    trace!("Rule {} matched -> {}", rule.label(), decision.kind());
                    Some(Evaluation {
                        decision,
                        matched: Some(rule),
                    })
                }
                Step::Continue => {
                    trace!("Rule {} matched but has nothing to do", rule.label());
                    None
                }
            }
        })
        .unwrap_or(Evaluation {
            decision: Decision::DefaultRedirect,
            matched: None,
        })
}

pub fn evaluate(rules: &[Rule], ctx: &RequestContext) -> Decision {
    explain(rules, ctx).decision
}

/// Normalise wire rules and evaluate them.
pub fn evaluate_raw(raw: Vec<RawRule>, ctx: &RequestContext) -> Decision {
    evaluate(&normalize_rules(raw), ctx)
}
