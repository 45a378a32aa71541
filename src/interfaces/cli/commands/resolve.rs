//! Resolve command: one attempt against the live upstreams

use std::sync::Arc;

use colored::Colorize;
use serde_json::json;

use crate::config::get_config;
use crate::context::{ClientRequest, Clock, FixedClock, SystemClock};
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::{shutdown::shutdown_signal, startup::build_resolver};
use crate::services::dispatcher::{Outcome, Render};
use crate::services::session::SessionStore;

pub async fn resolve_code(
    code: String,
    user_agent: String,
    ip: Option<String>,
    hour: Option<u32>,
    token: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let config = get_config();
    let session =
        SessionStore::from_token(token.as_deref().or(config.upstream.api_token.as_deref()));
    let clock: Arc<dyn Clock> = match hour {
        Some(h) => Arc::new(FixedClock(h)),
        None => Arc::new(SystemClock),
    };
    let resolver = build_resolver(&config, &session, clock);
    let request = ClientRequest::new(user_agent, ip);

    let attempt = async {
        let decided = resolver.decide(&code, &request).await?;
        let outcome = resolver
            .dispatcher()
            .dispatch(&code, decided.decision.clone())
            .await;
        Ok::<_, crate::errors::LinkgateError>((decided, outcome))
    };

    let (decided, outcome) = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            return Err(CliError::CommandError("interrupted".to_string()));
        }
        result = attempt => result?,
    };

    if json {
        let report = json!({
            "code": code,
            "context": decided.context,
            "rules_considered": decided.rules_considered,
            "matched_rule": decided.matched_rule,
            "decision": decided.decision,
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let ctx = &decided.context;
    println!("{} {}", "Short code:".bold(), code.cyan());
    println!(
        "  {} country={:?} city={:?} device={} browser={} os={} hour={}",
        "context:".dimmed(),
        ctx.country,
        ctx.city,
        ctx.device,
        ctx.browser,
        ctx.os,
        ctx.hour
    );
    println!(
        "  {} {} ({} rules, matched: {})",
        "decision:".dimmed(),
        decided.decision.kind().yellow(),
        decided.rules_considered,
        decided.matched_rule.as_deref().unwrap_or("none")
    );

    match &outcome {
        Outcome::Navigate { url } => println!("  {} {}", "navigate:".dimmed(), url.green()),
        Outcome::Render(Render::Blocked { reason }) => {
            println!("  {} {}", "blocked:".dimmed(), reason.red())
        }
        Outcome::Render(Render::Message { text }) => {
            println!("  {} {}", "message:".dimmed(), text)
        }
        Outcome::Render(Render::Landing { html }) => {
            println!("  {} {}", "landing:".dimmed(), html)
        }
        Outcome::Render(Render::Challenge { prompt, .. }) => {
            println!("  {} {} = ?", "challenge:".dimmed(), prompt)
        }
        Outcome::Failed { kind, message } => {
            println!("  {} {} ({:?})", "failed:".dimmed(), message.red(), kind)
        }
    }
    Ok(())
}
