//! CLI interface module
//!
//! This module provides command-line interface functionality for linkgate.

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use commands::{classify_user_agent_command, config_generate, resolve_code};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    UpstreamError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::UpstreamError(msg) => format!("Upstream error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::UpstreamError(msg) => {
                format!("{} {}", "Upstream error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::LinkgateError> for CliError {
    fn from(err: crate::errors::LinkgateError) -> Self {
        match err {
            crate::errors::LinkgateError::Serialization(msg) => CliError::ParseError(msg),
            crate::errors::LinkgateError::RulesFetch(_)
            | crate::errors::LinkgateError::DestinationFetch(_)
            | crate::errors::LinkgateError::DestinationNotFound(_) => {
                CliError::UpstreamError(err.to_string())
            }
            other => CliError::CommandError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::ParseError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Resolve {
            code,
            user_agent,
            ip,
            hour,
            token,
            json,
        } => resolve_code(code, user_agent, ip, hour, token, json).await,

        Commands::Classify { user_agent, json } => {
            classify_user_agent_command(&user_agent, json)
        }

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by server mode".to_string(),
        )),
    }
}
