pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod providers;
pub mod render;
pub mod repl;
pub mod session;
pub mod web;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use config::Settings;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat { debug } => {
            let settings = Settings::from_env()?;
            logging::init(&settings.log_level, debug);
            info!(model = %settings.model_name, "loaded runtime configuration");
            repl::run(&settings).await
        }
        Commands::Web { host, port, debug } => {
            let settings = Settings::from_env()?;
            logging::init(&settings.log_level, debug);
            info!(model = %settings.model_name, host = %host, port, "loaded runtime configuration");
            web::serve(settings, &host, port).await
        }
    }
}
