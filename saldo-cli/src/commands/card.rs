//! Card commands - credit cards

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;
use saldo_core::domain::{CreditCardPatch, NewCreditCard};
use saldo_core::CardType;

use super::{confirm, get_context, parse_amount};
use crate::output;

#[derive(Subcommand)]
pub enum CardCommands {
    /// List credit cards
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a credit card
    Add {
        name: String,
        /// Credit limit
        #[arg(long)]
        limit: String,
        /// Visa, MasterCard, American Express, Discover or Other
        #[arg(long, default_value = "Other")]
        card_type: String,
        /// Day of month the statement closes
        #[arg(long)]
        billing_day: u8,
        /// Day of month payment is due
        #[arg(long)]
        due_day: u8,
        /// Debt already on the card
        #[arg(long)]
        used: Option<String>,
        #[arg(long, default_value = "#A78BFA")]
        color: String,
    },
    /// Edit a credit card
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        card_type: Option<String>,
        #[arg(long)]
        billing_day: Option<u8>,
        #[arg(long)]
        due_day: Option<u8>,
        /// Replace the opening debt; the balance moves by the difference
        #[arg(long)]
        used: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a card with no transactions or transfers
    Rm {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: CardCommands) -> Result<()> {
    let ctx = get_context().await?;

    match command {
        CardCommands::List { json } => {
            let cards = ctx.credit_cards.list().await;
            if json {
                return output::print_json(&cards);
            }
            if cards.is_empty() {
                output::info("No credit cards yet. Add one with `saldo card add`.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Type", "Limit", "Balance", "Available", "Cycle/Due"]);
            for card in &cards {
                table.add_row(vec![
                    Cell::new(&card.id),
                    Cell::new(&card.name),
                    Cell::new(card.card_type.as_str()),
                    output::money_cell(card.credit_limit),
                    output::money_cell(card.balance),
                    output::money_cell(card.available_credit()),
                    Cell::new(format!("{}/{}", card.billing_cycle_day, card.payment_due_day)),
                ]);
            }
            println!("{}", table);
            println!("Total debt: {}", output::money(ctx.credit_cards.total_debt().await));
        }
        CardCommands::Add {
            name,
            limit,
            card_type,
            billing_day,
            due_day,
            used,
            color,
        } => {
            let new = NewCreditCard {
                name,
                credit_limit: parse_amount(&limit)?,
                card_type: CardType::parse(&card_type),
                billing_cycle_day: billing_day,
                payment_due_day: due_day,
                initial_amount_used: used.as_deref().map(parse_amount).transpose()?,
                color,
                order: Some(ctx.credit_cards.list().await.len() as i64),
                include_in_total: None,
            };
            let card = ctx.credit_cards.create(new).await?;
            output::success(&format!(
                "Card '{}' created ({}), available {}",
                card.name,
                card.id,
                output::money(card.available_credit())
            ));
        }
        CardCommands::Edit {
            id,
            name,
            limit,
            card_type,
            billing_day,
            due_day,
            used,
            color,
        } => {
            let patch = CreditCardPatch {
                name,
                credit_limit: limit.as_deref().map(parse_amount).transpose()?,
                card_type: card_type.as_deref().map(CardType::parse),
                billing_cycle_day: billing_day,
                payment_due_day: due_day,
                initial_amount_used: used.as_deref().map(parse_amount).transpose()?,
                color,
                ..CreditCardPatch::default()
            };
            let card = ctx.credit_cards.update(&id, patch).await?;
            let available = ctx.credit_cards.available_credit(&card.id).await?;
            output::success(&format!(
                "Card '{}' updated, balance {}, available {}",
                card.name,
                output::money(card.balance),
                output::money(available)
            ));
        }
        CardCommands::Rm { id, force } => {
            if !confirm(&format!("Remove credit card '{}'?", id), force)? {
                output::warning("Cancelled");
                return Ok(());
            }
            ctx.credit_cards.delete(&id).await?;
            output::success(&format!("Card '{}' removed", id));
        }
    }
    Ok(())
}
