//! Audit service - ledger health checks
//!
//! Works on persisted documents rather than the store caches so it can spot
//! balances that drifted after a swallowed balance write. Read-only.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::json;

use crate::domain::reconcile::{replay, transaction_effect, transfer_effects};
use crate::domain::result::Result;
use crate::domain::{
    Account, AccountRef, BalanceEffect, Category, CreditCardAccount, Loan, Transaction, Transfer,
};
use crate::ports::{Collection, DocumentStore};

use super::store::StoreAccess;

#[derive(Debug, Serialize)]
pub struct AuditResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: AuditSummary,
}

impl AuditResult {
    pub fn is_healthy(&self) -> bool {
        self.summary.errors == 0
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn from_findings(
        findings: Vec<serde_json::Value>,
        failing_status: &str,
        pass_message: &str,
        fail_message: impl FnOnce(usize) -> String,
    ) -> Self {
        if findings.is_empty() {
            Self {
                status: "pass".to_string(),
                message: pass_message.to_string(),
                details: None,
            }
        } else {
            Self {
                status: failing_status.to_string(),
                message: fail_message(findings.len()),
                details: Some(findings),
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}

async fn fetch<T: serde::de::DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &str,
) -> Result<Vec<T>> {
    store
        .list_all(path, None)
        .await?
        .into_iter()
        .map(|d| d.decode::<T>())
        .collect()
}

pub struct AuditService {
    access: StoreAccess,
}

impl AuditService {
    pub fn new(access: StoreAccess) -> Self {
        Self { access }
    }

    /// Run all checks against what is persisted for the signed-in user
    pub async fn run_checks(&self) -> Result<AuditResult> {
        let user_id = self.access.user_id().await?;
        let store = self.access.store();

        let accounts: Vec<Account> = fetch(store, &Collection::Accounts.path(&user_id)).await?;
        let cards: Vec<CreditCardAccount> =
            fetch(store, &Collection::CreditCards.path(&user_id)).await?;
        let categories: Vec<Category> =
            fetch(store, &Collection::Categories.path(&user_id)).await?;
        let transactions: Vec<Transaction> =
            fetch(store, &Collection::Transactions.path(&user_id)).await?;
        let transfers: Vec<Transfer> = fetch(store, &Collection::Transfers.path(&user_id)).await?;
        let loans: Vec<Loan> = fetch(store, &Collection::Loans.path(&user_id)).await?;

        let cash_ids: HashSet<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        let card_ids: HashSet<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        let category_ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        let resolve = |id: &str| {
            if cash_ids.contains(id) {
                Some(AccountRef::Cash(id.to_string()))
            } else if card_ids.contains(id) {
                Some(AccountRef::CreditLine(id.to_string()))
            } else {
                None
            }
        };

        let mut effects: Vec<BalanceEffect> = Vec::new();
        let mut orphaned_transactions = Vec::new();
        for tx in &transactions {
            match resolve(tx.account_id.as_str()) {
                Some(account) => effects.push(transaction_effect(account, tx.entry_type, tx.amount)),
                None => orphaned_transactions.push(json!({
                    "transaction_id": tx.id,
                    "account_id": tx.account_id
                })),
            }
            if !category_ids.contains(tx.category_id.as_str()) {
                orphaned_transactions.push(json!({
                    "transaction_id": tx.id,
                    "category_id": tx.category_id
                }));
            }
        }

        let mut orphaned_transfers = Vec::new();
        for transfer in &transfers {
            let from = resolve(transfer.from_account_id.as_str()).filter(AccountRef::is_cash);
            let to = resolve(transfer.to_account_id.as_str());
            match (from, to) {
                (Some(from), Some(to)) => {
                    effects.extend(transfer_effects(from, to, transfer.amount))
                }
                _ => orphaned_transfers.push(json!({
                    "transfer_id": transfer.id,
                    "from_account_id": transfer.from_account_id,
                    "to_account_id": transfer.to_account_id
                })),
            }
        }

        let balances = accounts
            .iter()
            .map(|a| (AccountRef::Cash(a.id.clone()), a.initial_balance, a.balance))
            .chain(
                cards
                    .iter()
                    .map(|c| (AccountRef::CreditLine(c.id.clone()), c.initial_balance, c.balance)),
            );
        let mut drift = Vec::new();
        for (account, initial, stored) in balances {
            let expected = replay(initial, &account, &effects);
            if expected != stored {
                drift.push(json!({
                    "account": account.to_string(),
                    "stored": stored,
                    "expected": expected,
                    "drift": stored - expected
                }));
            }
        }

        let orphaned_loans: Vec<serde_json::Value> = loans
            .iter()
            .filter(|l| resolve(l.origin_account_id.as_str()).is_none())
            .map(|l| json!({"loan_id": l.id, "origin_account_id": l.origin_account_id}))
            .collect();

        let mut checks = BTreeMap::new();
        checks.insert(
            "balance_drift".to_string(),
            CheckResult::from_findings(drift, "error", "All balances reconcile", |n| {
                format!("{} balance(s) disagree with their records", n)
            }),
        );
        checks.insert(
            "orphaned_transactions".to_string(),
            CheckResult::from_findings(
                orphaned_transactions,
                "error",
                "No orphaned transactions found",
                |n| format!("{} transaction reference(s) point at missing records", n),
            ),
        );
        checks.insert(
            "orphaned_transfers".to_string(),
            CheckResult::from_findings(
                orphaned_transfers,
                "error",
                "No orphaned transfers found",
                |n| format!("{} transfer(s) reference missing accounts", n),
            ),
        );
        checks.insert(
            "orphaned_loans".to_string(),
            CheckResult::from_findings(
                orphaned_loans,
                "warning",
                "Every loan has its origin account",
                |n| format!("{} loan(s) reference a missing origin account", n),
            ),
        );

        let passed = checks.values().filter(|c| c.status == "pass").count() as i64;
        let warnings = checks.values().filter(|c| c.status == "warning").count() as i64;
        let errors = checks.values().filter(|c| c.status == "error").count() as i64;
        tracing::info!(passed, warnings, errors, "audit finished");

        Ok(AuditResult {
            checks,
            summary: AuditSummary {
                passed,
                warnings,
                errors,
            },
        })
    }
}
