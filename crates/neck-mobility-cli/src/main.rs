//! Neck Mobility CLI Entry Point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neck_mobility_cli::{assess, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Diagnose(args) => assess::execute_diagnose(args)?,
        Commands::Analyze(args) => assess::execute_analyze(args)?,
        Commands::InitConfig(args) => assess::execute_init_config(args)?,
        Commands::Version => {
            println!("neck-mobility {}", env!("CARGO_PKG_VERSION"));
            println!("Core library version: {}", neck_mobility_core::VERSION);
        }
    }

    Ok(())
}
