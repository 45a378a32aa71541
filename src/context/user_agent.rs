//! User-Agent classification
//!
//! Deliberately coarse: each field is an ordered list of token checks and
//! the first hit wins. Rules are written against these labels ("Chrome",
//! "iOS", "tablet"), so changing the order changes which rules match.

use serde::Serialize;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    #[strum(serialize = "Internet Explorer")]
    #[serde(rename = "Internet Explorer")]
    InternetExplorer,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display)]
pub enum OperatingSystem {
    Android,
    #[strum(serialize = "iOS")]
    #[serde(rename = "iOS")]
    Ios,
    Windows,
    #[strum(serialize = "macOS")]
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Tablet,
    Mobile,
    Desktop,
}

/// Result of classifying one User-Agent string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub device: DeviceKind,
    pub os: OperatingSystem,
    pub browser: Browser,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            device: DeviceKind::Desktop,
            os: OperatingSystem::Unknown,
            browser: Browser::Unknown,
        }
    }
}

const CHROME_TOKENS: &[&str] = &["chrome", "crios"];
const FIREFOX_TOKENS: &[&str] = &["firefox", "fxios"];
const SAFARI_EXCLUDE_TOKENS: &[&str] = &["chrome", "crios", "android"];
const EDGE_TOKENS: &[&str] = &["edg"];
const OPERA_TOKENS: &[&str] = &["opera", "opr/"];
const IE_TOKENS: &[&str] = &["msie", "trident"];

const IOS_TOKENS: &[&str] = &["iphone", "ipad", "ipod"];

const TABLET_TOKENS: &[&str] = &["tablet", "ipad"];
const MOBILE_TOKENS: &[&str] = &["mobi", "android", "touch", "iphone", "ipod"];

#[inline]
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn detect_browser(ua: &str) -> Browser {
    if contains_any(ua, CHROME_TOKENS) {
        Browser::Chrome
    } else if contains_any(ua, FIREFOX_TOKENS) {
        Browser::Firefox
    } else if ua.contains("safari") && !contains_any(ua, SAFARI_EXCLUDE_TOKENS) {
        Browser::Safari
    } else if contains_any(ua, EDGE_TOKENS) {
        Browser::Edge
    } else if contains_any(ua, OPERA_TOKENS) {
        Browser::Opera
    } else if contains_any(ua, IE_TOKENS) {
        Browser::InternetExplorer
    } else {
        Browser::Unknown
    }
}

fn detect_os(ua: &str) -> OperatingSystem {
    if ua.contains("android") {
        OperatingSystem::Android
    } else if contains_any(ua, IOS_TOKENS) {
        OperatingSystem::Ios
    } else if ua.contains("windows nt") {
        OperatingSystem::Windows
    } else if ua.contains("mac os x") {
        OperatingSystem::MacOs
    } else if ua.contains("linux") {
        OperatingSystem::Linux
    } else {
        OperatingSystem::Unknown
    }
}

fn detect_device(ua: &str) -> DeviceKind {
    if contains_any(ua, TABLET_TOKENS) {
        DeviceKind::Tablet
    } else if contains_any(ua, MOBILE_TOKENS) {
        DeviceKind::Mobile
    } else {
        DeviceKind::Desktop
    }
}

/// Classify a raw User-Agent header value.
///
/// Matching is case-insensitive substring search. Never fails: an empty or
/// unrecognisable string yields `desktop` / `Unknown` / `Unknown`.
pub fn classify_user_agent(user_agent: &str) -> ClientInfo {
    let ua = user_agent.to_lowercase();
    if ua.trim().is_empty() {
        return ClientInfo::default();
    }

    ClientInfo {
        device: detect_device(&ua),
        os: detect_os(&ua),
        browser: detect_browser(&ua),
    }
}
