use clap::Parser;
use tracing::debug;

use linkgate::cli::Cli;
use linkgate::config::{LoggingConfig, init_config};
use linkgate::runtime::modes::{self, Mode};
use linkgate::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());
    let mode = modes::detect_mode(&cli);

    // CLI 模式只输出警告及以上，避免日志淹没命令输出
    let logging = match mode {
        #[cfg(feature = "cli")]
        Mode::Cli => LoggingConfig {
            level: "warn".to_string(),
            ..config.logging.clone()
        },
        _ => config.logging.clone(),
    };
    let _guard = init_logging(&logging)?;
    debug!("Running in {:?} mode", mode);

    match mode {
        #[cfg(feature = "server")]
        Mode::Server => modes::run_server().await,

        #[cfg(feature = "cli")]
        Mode::Cli => {
            let Some(command) = cli.command else {
                anyhow::bail!("no command given");
            };
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }

        Mode::Unknown => anyhow::bail!("no execution mode enabled in this build"),
    }
}
