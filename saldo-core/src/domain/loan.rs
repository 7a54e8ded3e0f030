//! Loan domain model
//!
//! Loans are tracked on their own: payments reduce `remaining` but never touch
//! an account balance.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reconcile::round_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Paid,
    Forgiven,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paid => "Paid",
            Self::Forgiven => "Forgiven",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money lent to someone, repaid through embedded payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(default)]
    pub id: String,
    pub borrower: String,
    /// Principal
    pub amount: Decimal,
    pub remaining: Decimal,
    pub origin_account_id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: LoanStatus,
    pub order: i64,
    #[serde(default)]
    pub payments: Vec<LoanPayment>,
}

impl Loan {
    /// Record a payment; the loan becomes `Paid` once nothing remains
    ///
    /// Only active loans accept payments, so a paid or forgiven loan never
    /// goes back to active.
    pub fn apply_payment(&mut self, payment: LoanPayment) -> Result<(), &'static str> {
        if self.status != LoanStatus::Active {
            return Err("loan is not active");
        }
        if payment.amount <= Decimal::ZERO {
            return Err("payment amount must be greater than zero");
        }
        self.remaining = round_money(self.remaining - payment.amount);
        self.payments.push(payment);
        if self.remaining <= Decimal::ZERO {
            self.status = LoanStatus::Paid;
        }
        Ok(())
    }

    pub fn forgive(&mut self) {
        self.status = LoanStatus::Forgiven;
    }

    pub fn total_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == LoanStatus::Active && self.due_date.is_some_and(|due| due < today)
    }
}

/// A repayment embedded in its loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayment {
    pub id: String,
    pub loan_id: String,
    pub amount: Decimal,
    /// Account the money came into (recorded, not reconciled)
    pub account_id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Input for recording a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub borrower: String,
    pub amount: Decimal,
    pub origin_account_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewLoan {
    /// Fresh loan: nothing repaid yet
    pub fn into_loan(self, id: impl Into<String>, order: i64) -> Loan {
        let amount = round_money(self.amount);
        Loan {
            id: id.into(),
            borrower: self.borrower,
            amount,
            remaining: amount,
            origin_account_id: self.origin_account_id,
            date: self.date,
            due_date: self.due_date,
            details: self.details,
            status: LoanStatus::Active,
            order,
            payments: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.borrower.trim().is_empty() {
            return Err("borrower cannot be empty");
        }
        if self.amount <= Decimal::ZERO {
            return Err("loan amount must be greater than zero");
        }
        Ok(())
    }
}

/// Input for a loan payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanPayment {
    pub amount: Decimal,
    pub account_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewLoanPayment {
    pub fn into_payment(self, id: impl Into<String>, loan_id: impl Into<String>) -> LoanPayment {
        LoanPayment {
            id: id.into(),
            loan_id: loan_id.into(),
            amount: round_money(self.amount),
            account_id: self.account_id,
            date: self.date,
            details: self.details,
        }
    }
}
