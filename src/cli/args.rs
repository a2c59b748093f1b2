//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::storage::{PaymentMethod, PaymentStatus};

/// bluesdr - Sales-lead copilot: analyze conversations, keep an append-only lead ledger
#[derive(Parser, Debug)]
#[command(name = "bluesdr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a pasted conversation and optionally save the lead
    Analyze {
        /// Read the transcript from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save without asking for confirmation
        #[arg(short, long, conflicts_with = "no_save")]
        yes: bool,

        /// Only show the analysis, never save
        #[arg(long)]
        no_save: bool,
    },

    /// List saved leads, most recent first
    Leads {
        /// Maximum number of leads to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Payment ledger commands
    #[command(subcommand)]
    Payments(PaymentsCommand),

    /// Show pipeline and cash KPIs
    Dashboard {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a ledger to a file
    Export {
        /// Ledger to export
        #[arg(short, long, value_enum, default_value = "leads")]
        table: ExportTable,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check configuration, API key and database
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentsCommand {
    /// Record a payment or expected receipt
    Add {
        /// Client name
        #[arg(short, long)]
        client: String,

        /// Amount received or expected
        #[arg(long)]
        value: f64,

        /// Service or product sold
        #[arg(short, long, default_value = "")]
        service: String,

        /// Payment method
        #[arg(short, long, value_enum, default_value = "pix")]
        method: PaymentMethod,

        /// Settlement status
        #[arg(long, value_enum, default_value = "paid")]
        status: PaymentStatus,

        /// External document reference (receipt or invoice link)
        #[arg(short, long)]
        document: Option<String>,
    },

    /// List recorded payments, most recent first
    List {
        /// Maximum number of payments to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTable {
    Leads,
    Payments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}
