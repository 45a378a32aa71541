//! Classify command

use colored::Colorize;

use crate::context::classify_user_agent;
use crate::interfaces::cli::CliError;

pub fn classify_user_agent_command(user_agent: &str, json: bool) -> Result<(), CliError> {
    let info = classify_user_agent(user_agent);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("  {} {}", "device: ".dimmed(), info.device.to_string().cyan());
    println!("  {} {}", "os:     ".dimmed(), info.os.to_string().cyan());
    println!("  {} {}", "browser:".dimmed(), info.browser.to_string().cyan());
    Ok(())
}
