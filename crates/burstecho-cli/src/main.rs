//! Burstecho CLI - render files through the burst delay.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "burstecho")]
#[command(author, version, about = "Burstecho fixed-point burst delay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the delay
    Process(commands::process::ProcessArgs),

    /// Show the effective engine settings and delay range
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
