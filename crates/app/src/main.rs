//! Warden - Main Entry Point
//!
//! Parses the command line, initializes logging, wires the OAuth2 client and
//! runs one command.

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut app = App::from_cli(&cli).await?;
    app.run(cli.command, &mut std::io::stdout().lock()).await?;

    Ok(())
}
