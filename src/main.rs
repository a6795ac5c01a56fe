extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use anyhow::Context;
use clap::Parser;
use creator_desk::{command::Cli, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    let cli = Cli::parse();

    if let Err(e) = start(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let state = AppState::new(config).context("Failed to initialize")?;

    creator_desk::command::run(cli, &state).await?;
    Ok(())
}
