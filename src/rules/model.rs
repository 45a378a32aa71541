//! Rule data model
//!
//! Rules arrive from the rules service as loosely typed JSON (`RawRule`).
//! `Rule::from_raw` turns them into the closed, strongly typed form the
//! evaluator works on; anything it cannot make sense of is rejected here so
//! the evaluator never has to.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

/// Request signal a rule is conditioned on
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConditionType {
    Country,
    City,
    Device,
    Browser,
    Os,
    Hour,
}

/// What a matching rule asks for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionType {
    Redirect,
    Block,
    Captcha,
    Message,
    LandingPage,
}

/// Action together with the payload it actually uses.
///
/// `actionValue` only travels with the variants that read it, so a block or
/// captcha rule can't accidentally carry a destination around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    Redirect(Option<String>),
    Block,
    Captcha,
    Message(Option<String>),
    LandingPage(Option<String>),
}

impl Action {
    fn new(kind: ActionType, value: Option<String>) -> Self {
        match kind {
            ActionType::Redirect => Action::Redirect(value),
            ActionType::Block => Action::Block,
            ActionType::Captcha => Action::Captcha,
            ActionType::Message => Action::Message(value),
            ActionType::LandingPage => Action::LandingPage(value),
        }
    }

    pub fn kind(&self) -> ActionType {
        match self {
            Action::Redirect(_) => ActionType::Redirect,
            Action::Block => ActionType::Block,
            Action::Captcha => ActionType::Captcha,
            Action::Message(_) => ActionType::Message,
            Action::LandingPage(_) => ActionType::LandingPage,
        }
    }
}

/// Rule precedence. Lower rank wins; unranked rules sort after every
/// ranked one.
///
/// Ranks keep the full numeric value, so `2` sorts before `2.9`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Priority {
    Ranked(f64),
    Unranked,
}

impl Priority {
    /// Only finite JSON numbers rank. Strings such as `"3"` do not.
    fn from_json(value: Option<&serde_json::Value>) -> Self {
        let Some(serde_json::Value::Number(n)) = value else {
            return Priority::Unranked;
        };
        match n.as_f64() {
            // + 0.0 folds -0.0 into 0.0
            Some(f) if f.is_finite() => Priority::Ranked(f + 0.0),
            _ => Priority::Unranked,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Priority::Ranked(a), Priority::Ranked(b)) => a.total_cmp(b),
            (Priority::Ranked(_), Priority::Unranked) => Ordering::Less,
            (Priority::Unranked, Priority::Ranked(_)) => Ordering::Greater,
            (Priority::Unranked, Priority::Unranked) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Ranked(p) => write!(f, "{}", p),
            Priority::Unranked => write!(f, "unranked"),
        }
    }
}

/// Wire form of a rule, as served by the rules service
///
/// Every field is optional and scalar fields accept strings, numbers or
/// booleans, so one sloppy rule cannot poison the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub condition_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub condition_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action_value: Option<String>,
    #[serde(default)]
    pub priority: Option<serde_json::Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Why a raw rule was dropped before evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRejection {
    UnknownCondition(String),
    UnknownAction(String),
}

impl fmt::Display for RuleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRejection::UnknownCondition(c) => write!(f, "unknown condition type '{}'", c),
            RuleRejection::UnknownAction(a) => write!(f, "unknown action type '{}'", a),
        }
    }
}

/// A validated rule, ready for evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub id: Option<String>,
    pub condition: ConditionType,
    pub condition_value: String,
    pub action: Action,
    pub priority: Priority,
}

impl Rule {
    pub fn from_raw(raw: RawRule) -> Result<Self, RuleRejection> {
        let condition_name = raw.condition_type.unwrap_or_default();
        let condition = condition_name
            .trim()
            .parse::<ConditionType>()
            .map_err(|_| RuleRejection::UnknownCondition(condition_name.clone()))?;

        let action_name = raw.action_type.unwrap_or_default();
        let action_type = action_name
            .trim()
            .parse::<ActionType>()
            .map_err(|_| RuleRejection::UnknownAction(action_name.clone()))?;

        Ok(Self {
            id: raw.id,
            condition,
            condition_value: raw.condition_value.unwrap_or_default(),
            action: Action::new(action_type, raw.action_value),
            priority: Priority::from_json(raw.priority.as_ref()),
        })
    }

    /// Identifier for logs; falls back to the condition when the service
    /// didn't send an id.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}={}", self.condition, self.condition_value),
        }
    }
}

/// Validate a batch of raw rules, dropping the ones that can never match.
///
/// Input order is preserved; the evaluator relies on it for tie-breaks.
pub fn normalize_rules(raw: Vec<RawRule>) -> Vec<Rule> {
    raw.into_iter()
        .filter_map(|r| {
            let id = r.id.clone();
            match Rule::from_raw(r) {
                Ok(rule) => Some(rule),
                Err(reason) => {
                    debug!("Discarding rule {:?}: {}", id, reason);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRule {
        serde_json::from_value(value).expect("raw rule should deserialize")
    }

    #[test]
    fn test_condition_type_parse_is_case_insensitive() {
        assert_eq!("COUNTRY".parse::<ConditionType>(), Ok(ConditionType::Country));
        assert_eq!("Os".parse::<ConditionType>(), Ok(ConditionType::Os));
        assert!("referrer".parse::<ConditionType>().is_err());
    }

    #[test]
    fn test_action_type_landing_page_name() {
        assert_eq!(ActionType::LandingPage.as_ref(), "landing_page");
        assert_eq!(
            "Landing_Page".parse::<ActionType>(),
            Ok(ActionType::LandingPage)
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Ranked(1.0) < Priority::Ranked(5.0));
        assert!(Priority::Ranked(2.0) < Priority::Ranked(2.9));
        assert!(Priority::Ranked(f64::MAX) < Priority::Unranked);
        assert!(Priority::Ranked(-3.0) < Priority::Ranked(0.0));
        assert_eq!(Priority::Unranked, Priority::Unranked);
    }

    #[test]
    fn test_priority_from_json() {
        assert_eq!(Priority::from_json(Some(&json!(4))), Priority::Ranked(4.0));
        assert_eq!(Priority::from_json(Some(&json!(2.9))), Priority::Ranked(2.9));
        assert_eq!(Priority::from_json(Some(&json!(-0.0))), Priority::Ranked(0.0));
        assert_eq!(Priority::from_json(Some(&json!("3"))), Priority::Unranked);
        assert_eq!(Priority::from_json(Some(&json!(null))), Priority::Unranked);
        assert_eq!(Priority::from_json(None), Priority::Unranked);
    }

    #[test]
    fn test_raw_rule_accepts_numbers_for_strings() {
        let rule = raw(json!({
            "id": 17,
            "conditionType": "hour",
            "conditionValue": 9,
            "actionType": "block",
            "actionValue": null,
            "priority": 1
        }));
        assert_eq!(rule.id.as_deref(), Some("17"));
        assert_eq!(rule.condition_value.as_deref(), Some("9"));
        assert_eq!(rule.action_value, None);
    }

    #[test]
    fn test_from_raw_builds_typed_rule() {
        let rule = Rule::from_raw(raw(json!({
            "id": "r1",
            "conditionType": " Country ",
            "conditionValue": "MX",
            "actionType": "redirect",
            "actionValue": "https://example.mx",
            "priority": 2
        })))
        .unwrap();

        assert_eq!(rule.condition, ConditionType::Country);
        assert_eq!(
            rule.action,
            Action::Redirect(Some("https://example.mx".to_string()))
        );
        assert_eq!(rule.priority, Priority::Ranked(2.0));
        assert_eq!(rule.label(), "r1");
    }

    #[test]
    fn test_from_raw_drops_payload_for_block() {
        let rule = Rule::from_raw(raw(json!({
            "conditionType": "os",
            "conditionValue": "Linux",
            "actionType": "block",
            "actionValue": "ignored"
        })))
        .unwrap();
        assert_eq!(rule.action, Action::Block);
        assert_eq!(rule.priority, Priority::Unranked);
        assert_eq!(rule.label(), "os=Linux");
    }

    #[test]
    fn test_from_raw_rejects_unknown_types() {
        let unknown_condition = Rule::from_raw(raw(json!({
            "conditionType": "referrer",
            "conditionValue": "x",
            "actionType": "block"
        })));
        assert_eq!(
            unknown_condition,
            Err(RuleRejection::UnknownCondition("referrer".to_string()))
        );

        let unknown_action = Rule::from_raw(raw(json!({
            "conditionType": "city",
            "conditionValue": "Lima",
            "actionType": "teleport"
        })));
        assert_eq!(
            unknown_action,
            Err(RuleRejection::UnknownAction("teleport".to_string()))
        );

        let missing = Rule::from_raw(RawRule::default());
        assert!(matches!(missing, Err(RuleRejection::UnknownCondition(_))));
    }

    #[test]
    fn test_normalize_rules_keeps_order() {
        let rules = normalize_rules(vec![
            raw(json!({"id": "a", "conditionType": "os", "conditionValue": "iOS", "actionType": "block"})),
            raw(json!({"id": "b", "conditionType": "weather", "conditionValue": "rain", "actionType": "block"})),
            raw(json!({"id": "c", "conditionType": "device", "conditionValue": "mobile", "actionType": "captcha"})),
        ]);
        let ids: Vec<_> = rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
