//! Status command - show balances and record counts

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let status = ctx.status_service.get_status().await;

    if json {
        return output::print_json(&status);
    }

    println!("{}", "Ledger Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Credit cards", &status.total_credit_cards.to_string()]);
    table.add_row(vec!["Categories", &status.total_categories.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);
    table.add_row(vec!["Transfers", &status.total_transfers.to_string()]);
    table.add_row(vec!["Loans", &status.total_loans.to_string()]);
    println!("{}", table);
    println!();

    if !status.accounts.is_empty() {
        let mut balances = output::create_table();
        balances.set_header(vec!["Account", "Kind", "Balance"]);
        for account in &status.accounts {
            balances.add_row(vec![
                Cell::new(&account.name),
                Cell::new(account.kind),
                output::money_cell(account.balance),
            ]);
        }
        println!("{}", balances);
        println!();
    }

    println!("Total balance:     {}", output::money(status.total_balance));
    println!("Card debt:         {}", output::money(status.total_card_debt));
    println!("Outstanding loans: {}", output::money(status.outstanding_loans));

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest)
    {
        println!();
        println!("Date range: {} to {}", earliest, latest);
    }

    Ok(())
}
