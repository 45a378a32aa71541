//! User-Agent classification tests

use linkgate::context::{Browser, DeviceKind, OperatingSystem, classify_user_agent};

const CRIOS_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0.6099.119 Mobile/15E148 Safari/604.1";
const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const FXIOS_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/121.0 Mobile/15E148 Safari/605.1.15";
const EDGE_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
const OPERA_PRESTO: &str = "Opera/9.80 (Windows NT 6.1; WOW64) Presto/2.12.388 Version/12.18";
const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Tablet";
const SAMSUNG_ANDROID_STOCK: &str = "Mozilla/5.0 (Linux; U; Android 4.0.3; ko-kr; LG-L160L Build/IML74K) AppleWebkit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30";
const CURL: &str = "curl/8.5.0";

#[test]
fn test_crios_is_chrome_on_ios() {
    let info = classify_user_agent(CRIOS_IPHONE);
    assert_eq!(info.browser, Browser::Chrome);
    assert_eq!(info.os, OperatingSystem::Ios);
    assert_eq!(info.device, DeviceKind::Mobile);
}

#[test]
fn test_ipad_is_tablet() {
    let info = classify_user_agent(SAFARI_IPAD);
    assert_eq!(info.device, DeviceKind::Tablet);
    assert_eq!(info.os, OperatingSystem::Ios);
    assert_eq!(info.browser, Browser::Safari);
}

#[test]
fn test_fxios_is_firefox() {
    assert_eq!(classify_user_agent(FXIOS_IPHONE).browser, Browser::Firefox);
}

#[test]
fn test_chrome_token_shadows_edge() {
    // first match wins, and Edge UAs carry "Chrome/"
    assert_eq!(classify_user_agent(EDGE_WINDOWS).browser, Browser::Chrome);
}

#[test]
fn test_edge_without_chrome_token() {
    let ua = "Mozilla/5.0 (Windows NT 10.0) Edg/120.0";
    assert_eq!(classify_user_agent(ua).browser, Browser::Edge);
}

#[test]
fn test_presto_opera() {
    let info = classify_user_agent(OPERA_PRESTO);
    assert_eq!(info.browser, Browser::Opera);
    assert_eq!(info.os, OperatingSystem::Windows);
}

#[test]
fn test_android_tablet_token() {
    let info = classify_user_agent(ANDROID_TABLET);
    assert_eq!(info.device, DeviceKind::Tablet);
    assert_eq!(info.os, OperatingSystem::Android);
}

#[test]
fn test_android_stock_browser_is_not_safari() {
    let info = classify_user_agent(SAMSUNG_ANDROID_STOCK);
    assert_eq!(info.browser, Browser::Unknown);
    assert_eq!(info.device, DeviceKind::Mobile);
}

#[test]
fn test_case_insensitive() {
    let info = classify_user_agent(&CRIOS_IPHONE.to_uppercase());
    assert_eq!(info.browser, Browser::Chrome);
    assert_eq!(info.os, OperatingSystem::Ios);
}

#[test]
fn test_tools_are_unknown_desktop() {
    let info = classify_user_agent(CURL);
    assert_eq!(info.browser, Browser::Unknown);
    assert_eq!(info.os, OperatingSystem::Unknown);
    assert_eq!(info.device, DeviceKind::Desktop);
}

#[test]
fn test_serialized_labels_match_rule_values() {
    let info = classify_user_agent(SAFARI_IPAD);
    let json = serde_json::to_value(info).unwrap();
    assert_eq!(json["device"], "tablet");
    assert_eq!(json["os"], "iOS");
    assert_eq!(json["browser"], "Safari");
}
