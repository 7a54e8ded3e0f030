//! Transaction ledger - income and expense records with balance reconciliation

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::reconcile::{transaction_effect, update_effects};
use crate::domain::result::{Error, Result};
use crate::domain::{
    monthly_totals, validate_amount, AccountRef, BalanceEffect, MonthlyTotals, NewTransaction,
    Transaction, TransactionPatch,
};
use crate::ports::{encode, Collection, OrderBy};

use super::reconciler::Reconciler;
use super::store::{validated, ErrorSlot, StoreAccess};
use super::CategoryService;

pub struct TransactionService {
    access: StoreAccess,
    reconciler: Arc<Reconciler>,
    categories: Arc<CategoryService>,
    transactions: RwLock<Vec<Transaction>>,
    /// Serializes update and delete so each sees the record it replaces
    writes: Mutex<()>,
    errors: ErrorSlot,
}

/// Newest first; ties keep insertion order
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

impl TransactionService {
    pub fn new(
        access: StoreAccess,
        reconciler: Arc<Reconciler>,
        categories: Arc<CategoryService>,
    ) -> Self {
        Self {
            access,
            reconciler,
            categories,
            transactions: RwLock::new(Vec::new()),
            writes: Mutex::new(()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    pub async fn load(&self) -> Result<Vec<Transaction>> {
        self.errors.clear();
        let result: Result<Vec<Transaction>> = async {
            let path = self.access.path(Collection::Transactions).await?;
            let docs = self
                .access
                .store()
                .list_all(&path, Some(&OrderBy::desc("date")))
                .await?;
            let transactions = docs
                .into_iter()
                .map(|d| d.decode::<Transaction>())
                .collect::<Result<Vec<_>>>()?;
            *self.transactions.write().await = transactions.clone();
            Ok(transactions)
        }
        .await;
        self.errors.track("load transactions", result)
    }

    pub async fn list(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Transaction> {
        self.transactions
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub async fn list_for_account(&self, account_id: &str) -> Vec<Transaction> {
        self.transactions
            .read()
            .await
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect()
    }

    pub async fn monthly_totals(&self, year: i32, month: u32) -> MonthlyTotals {
        monthly_totals(self.transactions.read().await.iter(), year, month)
    }

    /// Record a transaction and apply it to its account's balance
    pub async fn create(&self, new: NewTransaction) -> Result<Transaction> {
        self.errors.clear();
        let result = self.create_inner(new).await;
        self.errors.track("create transaction", result)
    }

    async fn create_inner(&self, new: NewTransaction) -> Result<Transaction> {
        validated(validate_amount(new.amount))?;
        self.check_category(&new.category_id).await?;
        let account = self.reconciler.require(&new.account_id).await?;

        let _guard = self.reconciler.lock([account.clone()]).await;
        self.reconciler.confirm(std::slice::from_ref(&account)).await?;

        let mut transaction = new.into_transaction(String::new());
        let path = self.access.path(Collection::Transactions).await?;
        transaction.id = self
            .access
            .store()
            .create(&path, encode(&transaction)?)
            .await?;
        tracing::info!(
            transaction_id = %transaction.id,
            account = %account,
            amount = %transaction.amount,
            kind = %transaction.entry_type,
            "transaction created"
        );

        {
            let mut transactions = self.transactions.write().await;
            transactions.push(transaction.clone());
            sort_newest_first(&mut transactions);
        }

        let effect = transaction_effect(account, transaction.entry_type, transaction.amount);
        self.reconciler.apply(&[effect]).await;
        Ok(transaction)
    }

    /// Rewrite a transaction: undo its old effect, then apply the new one
    pub async fn update(&self, id: &str, patch: TransactionPatch) -> Result<Transaction> {
        self.errors.clear();
        let result = self.update_inner(id, patch).await;
        self.errors.track("update transaction", result)
    }

    async fn update_inner(&self, id: &str, patch: TransactionPatch) -> Result<Transaction> {
        let _write = self.writes.lock().await;
        let old = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("transaction {}", id)))?;
        let new = old.patched(&patch);
        validated(validate_amount(new.amount))?;
        if new.category_id != old.category_id {
            self.check_category(&new.category_id).await?;
        }
        let new_account = self.reconciler.require(&new.account_id).await?;
        let old_account = self.previous_owner(&old).await;

        let _guard = self
            .reconciler
            .lock(old_account.iter().cloned().chain([new_account.clone()]))
            .await;
        self.reconciler
            .confirm(std::slice::from_ref(&new_account))
            .await?;

        let path = self.access.path(Collection::Transactions).await?;
        self.access.store().update(&path, id, encode(&new)?).await?;
        tracing::info!(transaction_id = %id, account = %new_account, "transaction updated");

        {
            let mut transactions = self.transactions.write().await;
            if let Some(slot) = transactions.iter_mut().find(|t| t.id == id) {
                *slot = new.clone();
            }
            sort_newest_first(&mut transactions);
        }

        let old_effects: Vec<BalanceEffect> = old_account
            .map(|account| transaction_effect(account, old.entry_type, old.amount))
            .into_iter()
            .collect();
        let new_effect = transaction_effect(new_account, new.entry_type, new.amount);
        self.reconciler
            .apply(&update_effects(&old_effects, &[new_effect]))
            .await;
        Ok(new)
    }

    /// Remove a transaction and reverse its effect
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.errors.clear();
        let result = self.delete_inner(id).await;
        self.errors.track("delete transaction", result)
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        let _write = self.writes.lock().await;
        let old = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("transaction {}", id)))?;
        let account = self.previous_owner(&old).await;

        let _guard = self.reconciler.lock(account.iter().cloned()).await;

        let path = self.access.path(Collection::Transactions).await?;
        self.access.store().delete(&path, id).await?;
        tracing::info!(transaction_id = %id, "transaction deleted");

        self.transactions.write().await.retain(|t| t.id != id);

        if let Some(account) = account {
            let effect = transaction_effect(account, old.entry_type, old.amount);
            self.reconciler.apply(&[effect.reversed()]).await;
        }
        Ok(())
    }

    async fn check_category(&self, category_id: &str) -> Result<()> {
        if self.categories.contains(category_id).await {
            Ok(())
        } else {
            Err(Error::reference(format!(
                "category {} does not exist",
                category_id
            )))
        }
    }

    /// Owner of a stored transaction; a vanished owner is logged and skipped
    async fn previous_owner(&self, transaction: &Transaction) -> Option<AccountRef> {
        let owner = self.reconciler.resolve(&transaction.account_id).await;
        if owner.is_none() {
            tracing::warn!(
                transaction_id = %transaction.id,
                account_id = %transaction.account_id,
                "owner account no longer exists, nothing to reverse"
            );
        }
        owner
    }
}
