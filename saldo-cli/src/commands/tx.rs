//! Transaction commands - income and expenses

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use clap::Subcommand;
use comfy_table::Cell;
use saldo_core::domain::{NewTransaction, TransactionPatch};
use saldo_core::EntryType;

use super::{confirm, get_context, parse_amount, parse_date, parse_optional_date};
use crate::output;

#[derive(Subcommand)]
pub enum TxCommands {
    /// List transactions, newest first
    List {
        /// Only transactions of this account or card
        #[arg(long)]
        account: Option<String>,
        /// Show the current month's totals
        #[arg(long)]
        month: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record an income or expense
    Add {
        /// income or expense
        #[arg(long = "type")]
        entry_type: String,
        amount: String,
        /// Account or credit card id
        #[arg(long)]
        account: String,
        #[arg(long)]
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Edit a transaction; balances follow
    Edit {
        id: String,
        #[arg(long = "type")]
        entry_type: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Remove a transaction and undo its effect
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn parse_type(raw: &str) -> Result<EntryType> {
    raw.parse::<EntryType>().map_err(|e| anyhow!(e))
}

pub async fn run(command: TxCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        TxCommands::List {
            account,
            month,
            json,
        } => {
            let transactions = match account.as_deref() {
                Some(id) => ctx.transactions.list_for_account(id).await,
                None => ctx.transactions.list().await,
            };
            if json {
                return output::print_json(&transactions);
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Date", "Type", "Amount", "Account", "Category", "Details"]);
            for tx in &transactions {
                table.add_row(vec![
                    Cell::new(&tx.id),
                    Cell::new(tx.date),
                    Cell::new(tx.entry_type.as_str()),
                    output::money_cell(tx.amount),
                    Cell::new(&tx.account_id),
                    Cell::new(&tx.category_id),
                    Cell::new(tx.details.as_deref().unwrap_or("")),
                ]);
            }
            println!("{}", table);

            if month {
                let today = Local::now().date_naive();
                let totals = ctx.transactions.monthly_totals(today.year(), today.month()).await;
                println!(
                    "{}-{:02}: income {}, expenses {}, net {}",
                    today.year(),
                    today.month(),
                    output::money(totals.income),
                    output::money(totals.expenses),
                    output::money(totals.net())
                );
            }
        }
        TxCommands::Add {
            entry_type,
            amount,
            account,
            category,
            date,
            details,
        } => {
            let new = NewTransaction {
                date: parse_date(date.as_deref())?,
                category_id: category,
                account_id: account,
                amount: parse_amount(&amount)?,
                entry_type: parse_type(&entry_type)?,
                details,
            };
            let tx = ctx.transactions.create(new).await?;
            output::success(&format!("Transaction {} recorded", tx.id));
        }
        TxCommands::Edit {
            id,
            entry_type,
            amount,
            account,
            category,
            date,
            details,
        } => {
            let patch = TransactionPatch {
                date: parse_optional_date(date.as_deref())?,
                category_id: category,
                account_id: account,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                entry_type: entry_type.as_deref().map(parse_type).transpose()?,
                details,
            };
            let tx = ctx.transactions.update(&id, patch).await?;
            output::success(&format!("Transaction {} updated", tx.id));
        }
        TxCommands::Rm { id, force } => {
            if !confirm(&format!("Remove transaction '{}'?", id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.transactions.delete(&id).await?;
            output::success(&format!("Transaction {} removed", id));
        }
    }
    Ok(())
}
