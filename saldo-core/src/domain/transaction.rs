//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reconcile::round_money;

/// Direction of a money movement; also the kind of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("unknown entry type: {}", other)),
        }
    }
}

/// A dated income or expense against one account or credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    pub category_id: String,
    /// Weak reference into either the cash or the credit-card store
    pub account_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Transaction {
    /// Copy of this transaction with the patch applied
    pub fn patched(&self, patch: &TransactionPatch) -> Self {
        Self {
            id: self.id.clone(),
            date: patch.date.unwrap_or(self.date),
            category_id: patch.category_id.clone().unwrap_or_else(|| self.category_id.clone()),
            account_id: patch.account_id.clone().unwrap_or_else(|| self.account_id.clone()),
            amount: patch.amount.map(round_money).unwrap_or(self.amount),
            entry_type: patch.entry_type.unwrap_or(self.entry_type),
            details: patch.details.clone().or_else(|| self.details.clone()),
        }
    }
}

/// Input for recording a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category_id: String,
    pub account_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            date: self.date,
            category_id: self.category_id,
            account_id: self.account_id,
            amount: round_money(self.amount),
            entry_type: self.entry_type,
            details: self.details,
        }
    }
}

/// Partial update for a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub details: Option<String>,
}

/// Amounts must be zero or positive; direction comes from the entry type
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err("amount cannot be negative");
    }
    Ok(())
}

/// Income and expense sums for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthlyTotals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl MonthlyTotals {
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Sum income and expenses dated within `year`/`month` (1-based month)
pub fn monthly_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
    month: u32,
) -> MonthlyTotals {
    transactions
        .into_iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .fold(MonthlyTotals::default(), |mut totals, t| {
            match t.entry_type {
                EntryType::Income => totals.income += t.amount,
                EntryType::Expense => totals.expenses += t.amount,
            }
            totals
        })
}
