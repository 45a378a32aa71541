//! Challenge flow tests
//!
//! A challenge decision issues a question; answers come back through
//! `complete_challenge`, which only ever takes the default-redirect path.

mod common;

use std::sync::Arc;

use serde_json::json;

use common::*;
use linkgate::context::ClientRequest;
use linkgate::services::challenge::WRONG_ANSWER_MESSAGE;
use linkgate::services::dispatcher::CHALLENGE_EXPIRED_MESSAGE;
use linkgate::services::{Outcome, Render, Resolver};

fn captcha_resolver(destinations: Arc<StaticDestination>) -> (Resolver, Arc<StaticRules>) {
    let rules = Arc::new(StaticRules::new(json!([
        {"conditionType": "country", "conditionValue": "MX", "actionType": "captcha", "priority": 1},
        {"conditionType": "country", "conditionValue": "MX", "actionType": "redirect", "actionValue": "https://rule.example", "priority": 2}
    ])));
    let resolver = resolver_with(
        rules.clone(),
        destinations,
        Arc::new(FixedGeo("MX", "Monterrey")),
        12,
    );
    (resolver, rules)
}

fn visitor() -> ClientRequest {
    ClientRequest::new(DESKTOP_CHROME, Some("201.141.0.10".to_string()))
}

fn expect_challenge(outcome: Outcome) -> (String, String, Option<String>) {
    match outcome {
        Outcome::Render(Render::Challenge {
            challenge_id,
            prompt,
            error,
        }) => (challenge_id, prompt, error),
        other => panic!("expected challenge page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_correct_answer_goes_to_default_destination() {
    let destinations = Arc::new(StaticDestination::new("https://home.example"));
    let (resolver, rules) = captcha_resolver(destinations.clone());

    let (id, prompt, error) = expect_challenge(resolver.resolve("promo", &visitor()).await);
    assert!(error.is_none());
    assert_eq!(destinations.count(), 0);

    let answer = solve(&prompt).to_string();
    let outcome = resolver.complete_challenge("promo", &id, &answer).await;

    // The default destination, not the lower-priority redirect rule
    assert_eq!(
        outcome,
        Outcome::Navigate {
            url: "https://home.example".into()
        }
    );
    assert_eq!(destinations.count(), 1);
    // Rules were not consulted again
    assert_eq!(rules.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_wrong_answers_keep_the_question() {
    let destinations = Arc::new(StaticDestination::new("https://home.example"));
    let (resolver, _) = captcha_resolver(destinations.clone());

    let (id, prompt, _) = expect_challenge(resolver.resolve("promo", &visitor()).await);
    let wrong = (solve(&prompt) + 1).to_string();

    for _ in 0..5 {
        let (retry_id, retry_prompt, error) =
            expect_challenge(resolver.complete_challenge("promo", &id, &wrong).await);
        assert_eq!(retry_id, id);
        assert_eq!(retry_prompt, prompt);
        assert_eq!(error.as_deref(), Some(WRONG_ANSWER_MESSAGE));
    }
    assert_eq!(destinations.count(), 0);

    let right = format!("  {}  ", solve(&prompt));
    assert!(matches!(
        resolver.complete_challenge("promo", &id, &right).await,
        Outcome::Navigate { .. }
    ));
}

#[tokio::test]
async fn test_success_happens_once() {
    let destinations = Arc::new(StaticDestination::new("https://home.example"));
    let (resolver, _) = captcha_resolver(destinations.clone());

    let (id, prompt, _) = expect_challenge(resolver.resolve("promo", &visitor()).await);
    let answer = solve(&prompt).to_string();

    assert!(matches!(
        resolver.complete_challenge("promo", &id, &answer).await,
        Outcome::Navigate { .. }
    ));

    // Replaying the same submission gets a fresh challenge, not a redirect
    let (fresh_id, _, error) =
        expect_challenge(resolver.complete_challenge("promo", &id, &answer).await);
    assert_ne!(fresh_id, id);
    assert_eq!(error.as_deref(), Some(CHALLENGE_EXPIRED_MESSAGE));
    assert_eq!(destinations.count(), 1);
}

#[tokio::test]
async fn test_concurrent_correct_answers_redirect_once() {
    let destinations = Arc::new(StaticDestination::new("https://home.example"));
    let (resolver, _) = captcha_resolver(destinations.clone());

    let (id, prompt, _) = expect_challenge(resolver.resolve("promo", &visitor()).await);
    let answer = solve(&prompt).to_string();

    let (a, b) = tokio::join!(
        resolver.complete_challenge("promo", &id, &answer),
        resolver.complete_challenge("promo", &id, &answer)
    );
    let navigations = [a, b]
        .iter()
        .filter(|o| matches!(o, Outcome::Navigate { .. }))
        .count();
    assert_eq!(navigations, 1);
    assert_eq!(destinations.count(), 1);
}

#[tokio::test]
async fn test_challenge_is_bound_to_its_code() {
    let destinations = Arc::new(StaticDestination::new("https://home.example"));
    let (resolver, _) = captcha_resolver(destinations.clone());

    let (id, prompt, _) = expect_challenge(resolver.resolve("promo", &visitor()).await);
    let answer = solve(&prompt).to_string();

    expect_challenge(resolver.complete_challenge("other", &id, &answer).await);
    assert_eq!(destinations.count(), 0);
}
