//! Account service - cash accounts and their cached balances

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::reconcile::round_money;
use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountPatch, AccountRef, BalanceEffect, NewAccount};
use crate::ports::{encode, Collection, OrderBy};

use super::reconciler::AccountLocks;
use super::store::{single_field, validated, ErrorSlot, StoreAccess};

pub struct AccountService {
    access: StoreAccess,
    locks: Arc<AccountLocks>,
    accounts: RwLock<Vec<Account>>,
    errors: ErrorSlot,
}

impl AccountService {
    pub fn new(access: StoreAccess, locks: Arc<AccountLocks>) -> Self {
        Self {
            access,
            locks,
            accounts: RwLock::new(Vec::new()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    /// Fetch every account, ordered by `order`, replacing the cache
    pub async fn load(&self) -> Result<Vec<Account>> {
        self.errors.clear();
        let result = self.load_inner().await;
        self.errors.track("load accounts", result)
    }

    async fn load_inner(&self) -> Result<Vec<Account>> {
        let path = self.access.path(Collection::Accounts).await?;
        let docs = self
            .access
            .store()
            .list_all(&path, Some(&OrderBy::asc("order")))
            .await?;
        let accounts = docs
            .into_iter()
            .map(|d| d.decode::<Account>())
            .collect::<Result<Vec<_>>>()?;
        *self.accounts.write().await = accounts.clone();
        Ok(accounts)
    }

    pub async fn list(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Account> {
        self.accounts.read().await.iter().find(|a| a.id == id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.accounts.read().await.iter().any(|a| a.id == id)
    }

    pub async fn create(&self, new: NewAccount) -> Result<Account> {
        self.errors.clear();
        let result = self.create_inner(new).await;
        self.errors.track("create account", result)
    }

    async fn create_inner(&self, new: NewAccount) -> Result<Account> {
        let mut account = new.into_account(String::new());
        validated(account.validate())?;

        let path = self.access.path(Collection::Accounts).await?;
        account.id = self.access.store().create(&path, encode(&account)?).await?;
        tracing::info!(account_id = %account.id, name = %account.name, "account created");

        self.accounts.write().await.push(account.clone());
        Ok(account)
    }

    /// Apply a partial update; an `initialBalance` change moves `balance` by
    /// the same delta
    pub async fn update(&self, id: &str, patch: AccountPatch) -> Result<Account> {
        self.errors.clear();
        let result = self.update_inner(id, patch).await;
        self.errors.track("update account", result)
    }

    async fn update_inner(&self, id: &str, patch: AccountPatch) -> Result<Account> {
        let _guard = self.locks.lock([AccountRef::Cash(id.to_string())]).await;

        let mut account = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("account {}", id)))?;
        account.apply_patch(&patch);
        validated(account.validate())?;

        let path = self.access.path(Collection::Accounts).await?;
        self.access
            .store()
            .update(&path, id, encode(&account)?)
            .await?;
        tracing::info!(account_id = %id, "account updated");

        self.replace_cached(account.clone()).await;
        Ok(account)
    }

    /// Remove an account nothing references any more
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.errors.clear();
        let result = self.delete_inner(id).await;
        self.errors.track("delete account", result)
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        // Ledgers confirm the account under this lock before writing
        let _guard = self.locks.lock([AccountRef::Cash(id.to_string())]).await;
        if !self.contains(id).await {
            return Err(Error::not_found(format!("account {}", id)));
        }
        let referenced = self
            .access
            .is_referenced(Collection::Transactions, "accountId", id)
            .await?
            || self
                .access
                .is_referenced(Collection::Transfers, "fromAccountId", id)
                .await?
            || self
                .access
                .is_referenced(Collection::Transfers, "toAccountId", id)
                .await?;
        if referenced {
            return Err(Error::in_use(format!(
                "account {} still has transactions or transfers",
                id
            )));
        }

        let path = self.access.path(Collection::Accounts).await?;
        self.access.store().delete(&path, id).await?;
        tracing::info!(account_id = %id, "account deleted");

        self.accounts.write().await.retain(|a| a.id != id);
        Ok(())
    }

    /// Overwrite the cached balance of one account
    pub async fn set_balance(&self, id: &str, balance: Decimal) -> Result<Account> {
        self.errors.clear();
        let result = async {
            let _guard = self.locks.lock([AccountRef::Cash(id.to_string())]).await;
            self.write_balance(id, round_money(balance)).await
        }
        .await;
        self.errors.track("set account balance", result)
    }

    /// Apply one reconciliation effect; caller holds the account lock
    pub(crate) async fn shift_balance(&self, id: &str, effect: &BalanceEffect) -> Result<Decimal> {
        let current = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("account {}", id)))?
            .balance;
        let account = self.write_balance(id, effect.apply_to(current)).await?;
        Ok(account.balance)
    }

    async fn write_balance(&self, id: &str, balance: Decimal) -> Result<Account> {
        let mut account = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("account {}", id)))?;

        let path = self.access.path(Collection::Accounts).await?;
        self.access
            .store()
            .update(&path, id, single_field("balance", serde_json::to_value(balance)?))
            .await?;

        account.balance = balance;
        self.replace_cached(account.clone()).await;
        Ok(account)
    }

    async fn replace_cached(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        if let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) {
            *slot = account;
        }
    }

    /// Sum of balances over accounts that count toward the total
    pub async fn total_balance(&self) -> Decimal {
        let accounts = self.accounts.read().await;
        round_money(
            accounts
                .iter()
                .filter(|a| a.counts_in_total())
                .map(|a| a.balance)
                .sum(),
        )
    }
}
