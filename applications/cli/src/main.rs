//! DevMatch - terminal front-end for the developer matchmaking service
mod config;
mod error;
mod repl;

use clap::{Parser, Subcommand};
use crate::config::AppConfig;
use devmatch_client::DevMatchClient;
use devmatch_core::{DevMatchError, Gateway};
use devmatch_engine::DevMatchApp;
use crate::repl::Repl;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devmatch")]
#[command(about = "Find, swipe on and connect with other developers", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./devmatch.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL, overriding the configuration
    #[arg(long, global = true, env = "DEVMATCH_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive session (default)
    Repl,
    /// Check that the backend is reachable
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with REPL output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "devmatch=info,devmatch_engine=info,devmatch_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), cli.url)?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl(config).await?,
        Commands::Check => check(config).await?,
    }

    Ok(())
}

async fn repl(config: AppConfig) -> error::Result<()> {
    tracing::info!(url = %config.server.url, "Starting DevMatch");

    let client = DevMatchClient::new(config.server)?;
    let app = DevMatchApp::new(Arc::new(client), config.engine);

    Repl::new(app).run().await
}

async fn check(config: AppConfig) -> error::Result<()> {
    let url = config.server.url.clone();
    let client = DevMatchClient::new(config.server)?;

    match client.profile_view().await {
        Ok(user) => println!("{url}: reachable, logged in as {}", user.full_name()),
        Err(DevMatchError::AuthRequired) => println!("{url}: reachable, no active session"),
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "Backend check failed");
            return Err(err.into());
        }
    }

    Ok(())
}
