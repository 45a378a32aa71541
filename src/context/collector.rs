use std::sync::Arc;

use tracing::trace;

use super::RequestContext;
use super::clock::Clock;
use super::user_agent::classify_user_agent;
use crate::services::geoip::GeoIpLookup;
use crate::utils::ip::is_public_ip;

/// The parts of an inbound request the context is built from
#[derive(Debug, Clone, Default)]
pub struct ClientRequest {
    pub user_agent: String,
    pub ip: Option<String>,
}

impl ClientRequest {
    pub fn new(user_agent: impl Into<String>, ip: Option<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ip,
        }
    }
}

#[derive(Clone)]
pub struct ContextCollector {
    geo: Arc<dyn GeoIpLookup>,
    clock: Arc<dyn Clock>,
}

impl ContextCollector {
    pub fn new(geo: Arc<dyn GeoIpLookup>, clock: Arc<dyn Clock>) -> Self {
        Self { geo, clock }
    }

    /// Build the context for one attempt. Never fails: whatever can't be
    /// determined is left empty (geo) or `Unknown` (user agent).
    pub async fn collect(&self, code: &str, request: &ClientRequest) -> RequestContext {
        let client = classify_user_agent(&request.user_agent);

        let geo = match request.ip.as_deref() {
            Some(ip) if is_public_ip(ip) => self.geo.lookup(ip).await.unwrap_or_default(),
            Some(ip) => {
                trace!("Skipping geo lookup for non-public address {}", ip);
                Default::default()
            }
            None => Default::default(),
        };

        RequestContext {
            code: code.to_string(),
            country: geo.country.unwrap_or_default(),
            city: geo.city.unwrap_or_default(),
            device: client.device.to_string(),
            browser: client.browser.to_string(),
            os: client.os.to_string(),
            hour: self.clock.current_hour(),
        }
    }
}
