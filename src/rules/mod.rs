//! Access/routing rules: wire model, normalisation and evaluation

pub mod decision;
pub mod evaluator;
pub mod model;

pub use decision::{BLOCK_REASON, DEFAULT_LANDING_HTML, DEFAULT_MESSAGE, Decision};
pub use evaluator::{Evaluation, Step, evaluate, evaluate_raw, explain, matches, ordered, step};
pub use model::{
    Action, ActionType, ConditionType, Priority, RawRule, Rule, RuleRejection, normalize_rules,
};
