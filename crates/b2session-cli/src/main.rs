//! b2session - authorize a Backblaze B2 account from the command line.
//!
//! Exchanges an application key ID and application key for an account
//! session, caches it, and prints it as text, JSON, or shell `export` lines
//! (`eval "$(b2session authorize --format env)"`).

mod cli;
mod commands;
mod output;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
    // Logs go to stderr so stdout stays clean for `eval`.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("b2session starting");

    match cli.command {
        Command::Authorize(args) => commands::authorize(args).await,
        Command::Show { format } => commands::show(format),
        Command::Logout { forget_key } => commands::logout(forget_key),
    }
}
