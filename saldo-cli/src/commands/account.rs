//! Account commands - cash accounts

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;
use saldo_core::domain::{AccountPatch, NewAccount};

use super::{confirm, get_context, parse_amount};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List cash accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a cash account
    Add {
        name: String,
        /// Opening balance
        #[arg(long, default_value = "0")]
        initial: String,
        /// Display color (hex)
        #[arg(long, default_value = "#60A5FA")]
        color: String,
        /// Leave out of the total balance
        #[arg(long)]
        exclude_from_total: bool,
    },
    /// Edit a cash account
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// New opening balance; the current balance moves by the difference
        #[arg(long)]
        initial: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        order: Option<i64>,
        /// Count toward the total balance (true/false)
        #[arg(long)]
        include_in_total: Option<bool>,
    },
    /// Remove an account with no transactions or transfers
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Overwrite the current balance
    SetBalance { id: String, balance: String },
}

pub async fn run(command: AccountCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        AccountCommands::List { json } => {
            let accounts = ctx.accounts.list().await;
            if json {
                return output::print_json(&accounts);
            }
            if accounts.is_empty() {
                output::info("No accounts yet. Run `saldo setup` or `saldo account add`.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Initial", "Balance", "In total"]);
            for account in &accounts {
                table.add_row(vec![
                    Cell::new(&account.id),
                    Cell::new(&account.name),
                    output::money_cell(account.initial_balance),
                    output::money_cell(account.balance),
                    Cell::new(if account.counts_in_total() { "yes" } else { "no" }),
                ]);
            }
            println!("{}", table);
            println!("Total: {}", output::money(ctx.accounts.total_balance().await));
        }
        AccountCommands::Add {
            name,
            initial,
            color,
            exclude_from_total,
        } => {
            let mut new = NewAccount::new(name, parse_amount(&initial)?);
            new.color = color;
            new.order = Some(ctx.accounts.list().await.len() as i64);
            new.include_in_total = Some(!exclude_from_total);
            let account = ctx.accounts.create(new).await?;
            output::success(&format!("Account '{}' created ({})", account.name, account.id));
        }
        AccountCommands::Edit {
            id,
            name,
            initial,
            color,
            order,
            include_in_total,
        } => {
            let patch = AccountPatch {
                name,
                initial_balance: initial.as_deref().map(parse_amount).transpose()?,
                color,
                order,
                include_in_total,
            };
            let account = ctx.accounts.update(&id, patch).await?;
            output::success(&format!(
                "Account '{}' updated, balance {}",
                account.name,
                output::money(account.balance)
            ));
        }
        AccountCommands::Rm { id, force } => {
            if !confirm(&format!("Remove account '{}'?", id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.accounts.delete(&id).await?;
            output::success(&format!("Account '{}' removed", id));
        }
        AccountCommands::SetBalance { id, balance } => {
            let account = ctx.accounts.set_balance(&id, parse_amount(&balance)?).await?;
            output::success(&format!(
                "Balance of '{}' set to {}",
                account.name,
                output::money(account.balance)
            ));
        }
    }
    Ok(())
}
