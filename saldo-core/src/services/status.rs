//! Status service - ledger-wide summary from the loaded stores

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    AccountService, CategoryService, CreditCardService, LoanService, TransactionService,
    TransferService,
};

/// Status service for ledger summaries
pub struct StatusService {
    accounts: Arc<AccountService>,
    cards: Arc<CreditCardService>,
    categories: Arc<CategoryService>,
    transactions: Arc<TransactionService>,
    transfers: Arc<TransferService>,
    loans: Arc<LoanService>,
}

impl StatusService {
    pub fn new(
        accounts: Arc<AccountService>,
        cards: Arc<CreditCardService>,
        categories: Arc<CategoryService>,
        transactions: Arc<TransactionService>,
        transfers: Arc<TransferService>,
        loans: Arc<LoanService>,
    ) -> Self {
        Self {
            accounts,
            cards,
            categories,
            transactions,
            transfers,
            loans,
        }
    }

    /// Get overall status summary
    pub async fn get_status(&self) -> StatusSummary {
        let accounts = self.accounts.list().await;
        let cards = self.cards.list().await;
        let transactions = self.transactions.list().await;

        let date_range = DateRange {
            earliest: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        StatusSummary {
            total_accounts: accounts.len() as i64,
            total_credit_cards: cards.len() as i64,
            total_categories: self.categories.list().await.len() as i64,
            total_transactions: transactions.len() as i64,
            total_transfers: self.transfers.list().await.len() as i64,
            total_loans: self.loans.list().await.len() as i64,
            total_balance: self.accounts.total_balance().await,
            total_card_debt: self.cards.total_debt().await,
            outstanding_loans: self.loans.outstanding().await,
            accounts: accounts
                .into_iter()
                .map(|a| AccountSummary {
                    id: a.id,
                    name: a.name,
                    kind: "cash",
                    balance: a.balance,
                })
                .chain(cards.into_iter().map(|c| AccountSummary {
                    id: c.id,
                    name: c.name,
                    kind: "credit",
                    balance: c.balance,
                }))
                .collect(),
            date_range,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_credit_cards: i64,
    pub total_categories: i64,
    pub total_transactions: i64,
    pub total_transfers: i64,
    pub total_loans: i64,
    /// Cash balance over accounts included in the total
    pub total_balance: Decimal,
    pub total_card_debt: Decimal,
    pub outstanding_loans: Decimal,
    pub accounts: Vec<AccountSummary>,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub kind: &'static str,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}
