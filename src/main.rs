//! tune-classifier - Main Entry Point

use clap::Parser;
use tune_classifier::cli::{cmd_list, cmd_sample, cmd_show, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tune_classifier=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            cmd_list();
        }
        Commands::Show { family } => {
            cmd_show(&family)?;
        }
        Commands::Sample { family, count, seed } => {
            cmd_sample(&family, count, seed)?;
        }
    }

    Ok(())
}
