//! `intune` -- CLI binary for the intune voice care pipeline.
//!
//! Provides the following subcommands:
//!
//! - `intune run` -- Run one utterance through the pipeline.
//! - `intune bench` -- Measure end-to-end latency percentiles.
//! - `intune config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// intune voice care pipeline CLI.
#[derive(Parser)]
#[command(name = "intune", about = "intune voice care pipeline CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run one utterance through the pipeline.
    Run(commands::run::RunArgs),

    /// Repeat pipeline runs and report latency percentiles.
    Bench(commands::bench::BenchArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `intune config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration.
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Show a specific configuration section.
    Section {
        /// Section name (e.g., "budgets", "safety", "models").
        name: String,

        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Bench(args) => commands::bench::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::config_cmd::config_show(&cfg);
            }
            ConfigCmd::Section { name, config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::config_cmd::config_section(&cfg, &name)?;
            }
        },
    }

    Ok(())
}
