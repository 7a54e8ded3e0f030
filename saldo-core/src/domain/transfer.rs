//! Transfer domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reconcile::round_money;

/// A fixed amount moved from a cash account to a cash account or credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default)]
    pub id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Transfer {
    pub fn patched(&self, patch: &TransferPatch) -> Self {
        Self {
            id: self.id.clone(),
            from_account_id: patch
                .from_account_id
                .clone()
                .unwrap_or_else(|| self.from_account_id.clone()),
            to_account_id: patch
                .to_account_id
                .clone()
                .unwrap_or_else(|| self.to_account_id.clone()),
            amount: patch.amount.map(round_money).unwrap_or(self.amount),
            date: patch.date.unwrap_or(self.date),
            details: patch.details.clone().or_else(|| self.details.clone()),
        }
    }

    pub fn touches(&self, account_id: &str) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }
}

/// Input for recording a transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewTransfer {
    pub fn into_transfer(self, id: impl Into<String>) -> Transfer {
        Transfer {
            id: id.into(),
            from_account_id: self.from_account_id,
            to_account_id: self.to_account_id,
            amount: round_money(self.amount),
            date: self.date,
            details: self.details,
        }
    }
}

/// Partial update for a transfer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPatch {
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub details: Option<String>,
}
