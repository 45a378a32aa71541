use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::client::{HttpDestinationResolver, HttpRuleSource};
use crate::config::StaticConfig;
use crate::context::{Clock, ContextCollector, SystemClock};
use crate::errors::LinkgateError;
use crate::services::challenge_store::ChallengeStore;
use crate::services::dispatcher::Dispatcher;
use crate::services::geoip::GeoIpProvider;
use crate::services::resolver::Resolver;
use crate::services::session::SessionStore;

pub struct StartupContext {
    pub resolver: Resolver,
    pub session: Arc<SessionStore>,
}

/// Wire the resolution pipeline from configuration.
///
/// The session store is passed in rather than created here so callers
/// (the CLI `--token` flag, tests) decide where credentials come from.
pub fn build_resolver(
    config: &StaticConfig,
    session: &SessionStore,
    clock: Arc<dyn Clock>,
) -> Resolver {
    let geo = GeoIpProvider::new(&config.geoip);
    debug!("GeoIP provider: {}", geo.provider_name());

    let collector = ContextCollector::new(Arc::new(geo), clock);
    let rules = Arc::new(HttpRuleSource::new(&config.upstream, session.subscribe()));
    let destinations = Arc::new(HttpDestinationResolver::new(
        &config.upstream,
        session.subscribe(),
    ));
    let dispatcher = Dispatcher::new(destinations, ChallengeStore::new(&config.challenge));

    Resolver::new(collector, rules, dispatcher)
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    check_upstream_url("upstream.rules_url", &config.upstream.rules_url)?;
    check_upstream_url("upstream.redirect_url", &config.upstream.redirect_url)?;

    let session = Arc::new(SessionStore::from_token(config.upstream.api_token.as_deref()));
    if session.current().is_authenticated() {
        info!("Upstream calls will carry a bearer token");
    }

    let resolver = build_resolver(config, &session, Arc::new(SystemClock));

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { resolver, session })
}

/// Reject upstream templates that can never produce a usable URL.
///
/// A template without `{code}` is allowed but logged, since every code
/// would then hit the same endpoint.
fn check_upstream_url(name: &str, template: &str) -> crate::errors::Result<()> {
    let sample = template.replace("{code}", "probe");
    let parsed = url::Url::parse(&sample).map_err(|e| {
        LinkgateError::config(format!("{} is not a valid URL ({}): {}", name, e, template))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LinkgateError::config(format!(
            "{} must be http or https, got {}",
            name,
            parsed.scheme()
        )));
    }
    if !template.contains("{code}") {
        warn!("{} has no {{code}} placeholder: {}", name, template);
    }
    Ok(())
}
