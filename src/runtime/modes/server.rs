//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, health_routes, redirect_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Prefix the health endpoints are mounted under
pub const HEALTH_PREFIX: &str = "/health";

/// Run server mode
pub async fn run_server() -> Result<()> {
    let config = get_config();
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup(&config).await?;
    let resolver = web::Data::new(startup.resolver);
    let session = startup.session;

    if config.server.trusted_proxies.is_empty() {
        warn!(
            "No trusted_proxies configured: connections from private IPs will use X-Forwarded-For. \
             Configure server.trusted_proxies to restrict this."
        );
    } else {
        info!("Trusted proxies: {:?}", config.server.trusted_proxies);
    }

    let cpu_count = config.server.cpu_count.max(1);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .app_data(resolver.clone())
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::FormConfig::default().limit(4 * 1024))
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .service(web::scope(HEALTH_PREFIX).service(health_routes()))
            .service(redirect_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&session) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
