//! Saldo CLI - personal finance ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{account, audit, card, category, loan, setup, status, transfer, tx};
use saldo_core::config::Config;

/// Saldo - accounts, cards, loans and transfers in your terminal
#[derive(Parser)]
#[command(name = "saldo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed default categories and accounts for the configured user
    Setup {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show balances and record counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that balances reconcile with their records
    Audit {
        /// Show every finding
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage cash accounts
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// Manage credit cards
    Card {
        #[command(subcommand)]
        command: card::CardCommands,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: category::CategoryCommands,
    },

    /// Record income and expenses
    Tx {
        #[command(subcommand)]
        command: tx::TxCommands,
    },

    /// Move money between accounts
    Transfer {
        #[command(subcommand)]
        command: transfer::TransferCommands,
    },

    /// Track money lent out
    Loan {
        #[command(subcommand)]
        command: loan::LoanCommands,
    },
}

fn init_tracing() {
    let level = Config::data_dir()
        .and_then(|dir| Config::load(&dir))
        .map(|config| config.log_level)
        .unwrap_or_else(|_| saldo_core::config::DEFAULT_LOG_LEVEL.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Setup { json } => setup::run(json).await,
        Commands::Status { json } => status::run(json).await,
        Commands::Audit { verbose, json } => audit::run(verbose, json).await,
        Commands::Account { command } => account::run(command).await,
        Commands::Card { command } => card::run(command).await,
        Commands::Category { command } => category::run(command).await,
        Commands::Tx { command } => tx::run(command).await,
        Commands::Transfer { command } => transfer::run(command).await,
        Commands::Loan { command } => loan::run(command).await,
    }
}
