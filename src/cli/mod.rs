//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod register;
pub mod resolve;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Customer intake with route-validated addresses
#[derive(Parser)]
#[command(name = "client-intake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a customer interactively
    Register(register::RegisterArgs),

    /// Resolve an address or a coordinate once
    Resolve(resolve::ResolveArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Verify an auth token against the backend
    Token(token::TokenArgs),
}

/// Install the tracing subscriber; `RUST_LOG` overrides `default_level`
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Register(args) => register::run(args).await,
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Token(args) => token::run(args).await,
    }
}
