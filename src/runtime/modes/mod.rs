//! Mode routing
//!
//! This module provides unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (one-shot commands)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

use crate::cli::Cli;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run based on the parsed command line
///
/// No subcommand (or `serve`) means server mode; anything else is a CLI
/// command.
pub fn detect_mode(cli: &Cli) -> Mode {
    #[cfg(feature = "cli")]
    if !cli.is_server() {
        return Mode::Cli;
    }

    #[cfg(feature = "server")]
    if cli.is_server() {
        return Mode::Server;
    }

    let _ = cli;
    Mode::Unknown
}
