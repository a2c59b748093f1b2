//! bluesdr - Sales-lead copilot
//!
//! Entry point for the bluesdr CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bluesdr::cli::{commands, Cli, Commands};
use bluesdr::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Completions never touch config or logging.
    if let Commands::Completions { shell } = cli.command {
        bluesdr::cli::completions::print(shell);
        return Ok(());
    }

    let settings = Settings::load()?;

    // Initialize logging: RUST_LOG wins, then --verbose, then the config file.
    let default_filter = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Analyze { file, yes, no_save } => {
            commands::analyze_conversation(&settings, file, yes, no_save).await?;
        }
        Commands::Leads { limit } => {
            commands::list_leads(&settings, limit).await?;
        }
        Commands::Payments(payments_cmd) => {
            commands::payments_command(&settings, payments_cmd).await?;
        }
        Commands::Dashboard { json } => {
            commands::show_dashboard(&settings, json).await?;
        }
        Commands::Export {
            table,
            format,
            output,
        } => {
            commands::export_ledger(&settings, table, format, output).await?;
        }
        Commands::Doctor { json } => {
            commands::run_doctor(&settings, json).await?;
        }
        Commands::Config(config_cmd) => {
            commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
