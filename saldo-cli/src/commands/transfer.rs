//! Transfer commands

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;
use saldo_core::domain::{NewTransfer, TransferPatch};

use super::{confirm, get_context, parse_amount, parse_date, parse_optional_date};
use crate::output;

#[derive(Subcommand)]
pub enum TransferCommands {
    /// List transfers, newest first
    List {
        /// Only transfers touching this account or card
        #[arg(long)]
        account: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move money from a cash account to an account or card
    Add {
        amount: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Edit a transfer; balances follow
    Edit {
        id: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Remove a transfer and return the money
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: TransferCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        TransferCommands::List { account, json } => {
            let transfers = match account.as_deref() {
                Some(id) => ctx.transfers.list_for_account(id).await,
                None => ctx.transfers.list().await,
            };
            if json {
                return output::print_json(&transfers);
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Date", "From", "To", "Amount", "Details"]);
            for transfer in &transfers {
                table.add_row(vec![
                    Cell::new(&transfer.id),
                    Cell::new(transfer.date),
                    Cell::new(&transfer.from_account_id),
                    Cell::new(&transfer.to_account_id),
                    output::money_cell(transfer.amount),
                    Cell::new(transfer.details.as_deref().unwrap_or("")),
                ]);
            }
            println!("{}", table);
        }
        TransferCommands::Add {
            amount,
            from,
            to,
            date,
            details,
        } => {
            let new = NewTransfer {
                from_account_id: from,
                to_account_id: to,
                amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                details,
            };
            let transfer = ctx.transfers.create(new).await?;
            output::success(&format!(
                "Moved {} from '{}' to '{}'",
                output::money(transfer.amount),
                transfer.from_account_id,
                transfer.to_account_id
            ));
        }
        TransferCommands::Edit {
            id,
            amount,
            from,
            to,
            date,
            details,
        } => {
            let patch = TransferPatch {
                from_account_id: from,
                to_account_id: to,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: parse_optional_date(date.as_deref())?,
                details,
            };
            let transfer = ctx.transfers.update(&id, patch).await?;
            output::success(&format!("Transfer {} updated", transfer.id));
        }
        TransferCommands::Rm { id, force } => {
            if !confirm(&format!("Remove transfer '{}'?", id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.transfers.delete(&id).await?;
            output::success(&format!("Transfer {} removed", id));
        }
    }
    Ok(())
}
