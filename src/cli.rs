//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for linkgate using clap's derive macros.

use clap::{Parser, Subcommand};

/// linkgate - rule-driven redirect front-end for short links
#[derive(Parser)]
#[command(name = "linkgate")]
#[command(version)]
#[command(about = "Rule-driven redirect front-end for short links", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Run one resolution attempt against the configured upstreams
    Resolve {
        /// Short code to resolve
        code: String,

        /// User-Agent to classify
        #[arg(long, short = 'u', default_value = "")]
        user_agent: String,

        /// Client IP used for the geo lookup
        #[arg(long)]
        ip: Option<String>,

        /// Pretend the local hour is this (0-23)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,

        /// Bearer token for the upstream services (overrides upstream.api_token)
        #[arg(long)]
        token: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a User-Agent string is classified
    Classify {
        /// User-Agent string
        user_agent: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Whether this invocation starts the server
    pub fn is_server(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }
}
