use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grammarbook::cli::Cli;
use grammarbook::config::Config;
use grammarbook::utils::{AppError, report_error};

fn init_logging(debug: bool) {
    let default_filter = if debug { "grammarbook=debug" } else { "grammarbook=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Ensure configuration exists and load it
    if cli.config.is_none() {
        Config::ensure_config_exists()?;
    }

    let mut config = if let Some(config_path) = &cli.config {
        Config::load_custom(config_path)?
    } else {
        Config::load()?
    };
    cli.apply_overrides(&mut config);

    let command = cli.command.unwrap_or_default();
    if let Err(err) = command.execute(config, cli.file.as_deref()).await {
        if let Some(app_err) = err.downcast_ref::<AppError>() {
            report_error(app_err);
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
