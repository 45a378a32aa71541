use tokio::signal;
use tracing::{info, warn};

use crate::services::session::SessionStore;

/// Resolves once Ctrl+C arrives. Also usable as a teardown future for
/// `Resolver::resolve_until`.
pub async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}

pub async fn listen_for_shutdown(session: &SessionStore) {
    shutdown_signal().await;

    // Drop credentials before the clients go away
    session.clear();
    info!("Session cleared, shutting down...");
}
