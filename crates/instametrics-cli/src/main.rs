mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "instametrics-cli")]
#[command(about = "Instagram profile metrics from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a profile dashboard and print its metrics
    Report {
        /// Instagram username to report on (the access token's own account)
        username: String,
        /// Print the dashboard as JSON instead of formatted text
        #[arg(long)]
        json: bool,
        /// Number of recent posts to fetch (defaults to `INSTAGRAM_MEDIA_LIMIT`)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = instametrics_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Report {
            username,
            json,
            limit,
        }) => report::run_report(&config, &username, json, limit).await?,
        None => println!("instametrics-cli: run `instametrics-cli report <username>`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
