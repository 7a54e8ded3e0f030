//! Loan commands - money lent out

use anyhow::Result;
use chrono::Local;
use clap::Subcommand;
use comfy_table::{Cell, Color};
use saldo_core::domain::{NewLoan, NewLoanPayment};
use saldo_core::LoanStatus;

use super::{confirm, get_context, parse_amount, parse_date, parse_optional_date};
use crate::output;

#[derive(Subcommand)]
pub enum LoanCommands {
    /// List loans, oldest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a loan
    Add {
        borrower: String,
        amount: String,
        /// Account the money left from
        #[arg(long)]
        from: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Record a repayment
    Pay {
        loan_id: String,
        amount: String,
        /// Account the money came into
        #[arg(long)]
        to: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Write a loan off
    Forgive {
        loan_id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Remove a loan and its payments
    Rm {
        loan_id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: LoanCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        LoanCommands::List { json } => {
            let loans = ctx.loans.list().await;
            if json {
                return output::print_json(&loans);
            }

            let today = Local::now().date_naive();
            let mut table = output::create_table();
            table.set_header(vec!["ID", "Borrower", "Amount", "Paid", "Remaining", "Status", "Due", "Payments"]);
            for loan in &loans {
                let status = match loan.status {
                    LoanStatus::Active if loan.is_overdue(today) => {
                        Cell::new("Overdue").fg(Color::Red)
                    }
                    LoanStatus::Active => Cell::new("Active").fg(Color::Yellow),
                    LoanStatus::Paid => Cell::new("Paid").fg(Color::Green),
                    LoanStatus::Forgiven => Cell::new("Forgiven").fg(Color::DarkGrey),
                };
                table.add_row(vec![
                    Cell::new(&loan.id),
                    Cell::new(&loan.borrower),
                    output::money_cell(loan.amount),
                    output::money_cell(loan.total_paid()),
                    output::money_cell(loan.remaining),
                    status,
                    Cell::new(loan.due_date.map(|d| d.to_string()).unwrap_or_default()),
                    Cell::new(loan.payments.len()),
                ]);
            }
            println!("{}", table);
            println!("Outstanding: {}", output::money(ctx.loans.outstanding().await));
        }
        LoanCommands::Add {
            borrower,
            amount,
            from,
            date,
            due,
            details,
        } => {
            let new = NewLoan {
                borrower,
                amount: parse_amount(&amount)?,
                origin_account_id: from,
                date: parse_date(date.as_deref())?,
                due_date: parse_optional_date(due.as_deref())?,
                details,
            };
            let loan = ctx.loans.create(new).await?;
            output::success(&format!("Loan to '{}' recorded ({})", loan.borrower, loan.id));
        }
        LoanCommands::Pay {
            loan_id,
            amount,
            to,
            date,
            details,
        } => {
            let payment = NewLoanPayment {
                amount: parse_amount(&amount)?,
                account_id: to,
                date: parse_date(date.as_deref())?,
                details,
            };
            let loan = ctx.loans.add_payment(&loan_id, payment).await?;
            output::success(&format!(
                "Payment recorded, remaining {} ({})",
                output::money(loan.remaining),
                loan.status
            ));
        }
        LoanCommands::Forgive { loan_id, force } => {
            if !confirm(&format!("Forgive loan '{}'?", loan_id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.loans.forgive(&loan_id).await?;
            output::success(&format!("Loan {} forgiven", loan_id));
        }
        LoanCommands::Rm { loan_id, force } => {
            if !confirm(&format!("Remove loan '{}'?", loan_id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.loans.delete(&loan_id).await?;
            output::success(&format!("Loan {} removed", loan_id));
        }
    }
    Ok(())
}
