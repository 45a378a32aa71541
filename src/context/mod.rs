//! Request context collection
//!
//! Everything the rule evaluator is allowed to look at is gathered here,
//! once per resolution attempt, into an immutable `RequestContext`.

pub mod clock;
pub mod collector;
pub mod user_agent;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collector::{ClientRequest, ContextCollector};
pub use user_agent::{Browser, ClientInfo, DeviceKind, OperatingSystem, classify_user_agent};

use serde::Serialize;

use crate::rules::ConditionType;

/// Value used by the classifier when it can't tell
pub const UNKNOWN: &str = "Unknown";

/// Snapshot of request-time signals for one resolution attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub code: String,
    pub country: String,
    pub city: String,
    pub device: String,
    pub browser: String,
    pub os: String,
    /// Two-digit, zero-padded 24-hour local time
    pub hour: String,
}

impl RequestContext {
    /// The context value a rule of the given condition type is compared to.
    pub fn field(&self, condition: ConditionType) -> &str {
        match condition {
            ConditionType::Country => &self.country,
            ConditionType::City => &self.city,
            ConditionType::Device => &self.device,
            ConditionType::Browser => &self.browser,
            ConditionType::Os => &self.os,
            ConditionType::Hour => &self.hour,
        }
    }
}
