//! Applies balance effects to the account and credit-card stores
//!
//! Ledgers resolve raw account ids here, lock every account they are about to
//! touch, persist their own record and then hand the resulting effects over.
//! A failed balance write is logged and skipped; the primary record stays
//! committed and the drift shows up in an audit.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::result::{Error, Result};
use crate::domain::{AccountRef, BalanceEffect};

use super::{AccountService, CreditCardService};

/// One async mutex per account, handed out on demand
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountRef, Arc<AsyncMutex<()>>>>,
}

/// Holds every lock taken by one `AccountLocks::lock` call
#[derive(Debug)]
pub struct AccountGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, account: &AccountRef) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(account.clone()).or_default().clone()
    }

    /// Lock a set of accounts; always acquired in sorted order, duplicates once
    pub async fn lock(&self, accounts: impl IntoIterator<Item = AccountRef>) -> AccountGuard {
        let ordered: BTreeSet<AccountRef> = accounts.into_iter().collect();
        let mut guards = Vec::with_capacity(ordered.len());
        for account in &ordered {
            guards.push(self.entry(account).lock_owned().await);
        }
        AccountGuard { _guards: guards }
    }
}

pub struct Reconciler {
    accounts: Arc<AccountService>,
    cards: Arc<CreditCardService>,
    locks: Arc<AccountLocks>,
}

impl Reconciler {
    pub fn new(
        accounts: Arc<AccountService>,
        cards: Arc<CreditCardService>,
        locks: Arc<AccountLocks>,
    ) -> Self {
        Self {
            accounts,
            cards,
            locks,
        }
    }

    /// Cash store first, then credit lines
    pub async fn resolve(&self, account_id: &str) -> Option<AccountRef> {
        if self.accounts.contains(account_id).await {
            Some(AccountRef::Cash(account_id.to_string()))
        } else if self.cards.contains(account_id).await {
            Some(AccountRef::CreditLine(account_id.to_string()))
        } else {
            None
        }
    }

    /// Like `resolve`, failing with `Reference` when the id is unknown
    pub async fn require(&self, account_id: &str) -> Result<AccountRef> {
        self.resolve(account_id)
            .await
            .ok_or_else(|| Error::reference(format!("account {} does not exist", account_id)))
    }

    /// Resolve an id that must name a cash account
    pub async fn require_cash(&self, account_id: &str) -> Result<AccountRef> {
        if self.accounts.contains(account_id).await {
            Ok(AccountRef::Cash(account_id.to_string()))
        } else {
            Err(Error::reference(format!(
                "cash account {} does not exist",
                account_id
            )))
        }
    }

    pub async fn lock(&self, accounts: impl IntoIterator<Item = AccountRef>) -> AccountGuard {
        self.locks.lock(accounts).await
    }

    /// Fail with `Reference` if any of `accounts` has been removed
    ///
    /// Call while holding their locks: a store deletes an account under the
    /// same lock, so the answer stays true until the guard is dropped.
    pub async fn confirm(&self, accounts: &[AccountRef]) -> Result<()> {
        for account in accounts {
            let exists = match account {
                AccountRef::Cash(id) => self.accounts.contains(id).await,
                AccountRef::CreditLine(id) => self.cards.contains(id).await,
            };
            if !exists {
                return Err(Error::reference(format!("account {} was removed", account)));
            }
        }
        Ok(())
    }

    pub async fn balance(&self, account: &AccountRef) -> Option<Decimal> {
        match account {
            AccountRef::Cash(id) => self.accounts.get(id).await.map(|a| a.balance),
            AccountRef::CreditLine(id) => self.cards.get(id).await.map(|c| c.balance),
        }
    }

    /// Apply effects in order; the caller must hold the locks for their accounts
    pub async fn apply(&self, effects: &[BalanceEffect]) {
        for effect in effects {
            let result = match &effect.account {
                AccountRef::Cash(id) => self.accounts.shift_balance(id, effect).await,
                AccountRef::CreditLine(id) => self.cards.shift_balance(id, effect).await,
            };
            match result {
                Ok(balance) => {
                    tracing::debug!(account = %effect.account, %balance, "balance updated")
                }
                Err(e) => tracing::warn!(
                    account = %effect.account,
                    error = %e,
                    "balance update failed, record kept"
                ),
            }
        }
    }
}
