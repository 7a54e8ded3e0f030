//! Credit card service - credit lines whose negative balance is debt

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::reconcile::round_money;
use crate::domain::result::{Error, Result};
use crate::domain::{AccountRef, BalanceEffect, CreditCardAccount, CreditCardPatch, NewCreditCard};
use crate::ports::{encode, Collection, OrderBy};

use super::reconciler::AccountLocks;
use super::store::{single_field, validated, ErrorSlot, StoreAccess};

pub struct CreditCardService {
    access: StoreAccess,
    locks: Arc<AccountLocks>,
    cards: RwLock<Vec<CreditCardAccount>>,
    errors: ErrorSlot,
}

impl CreditCardService {
    pub fn new(access: StoreAccess, locks: Arc<AccountLocks>) -> Self {
        Self {
            access,
            locks,
            cards: RwLock::new(Vec::new()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    pub async fn load(&self) -> Result<Vec<CreditCardAccount>> {
        self.errors.clear();
        let result: Result<Vec<CreditCardAccount>> = async {
            let path = self.access.path(Collection::CreditCards).await?;
            let docs = self
                .access
                .store()
                .list_all(&path, Some(&OrderBy::asc("order")))
                .await?;
            let cards = docs
                .into_iter()
                .map(|d| d.decode::<CreditCardAccount>())
                .collect::<Result<Vec<_>>>()?;
            *self.cards.write().await = cards.clone();
            Ok(cards)
        }
        .await;
        self.errors.track("load credit cards", result)
    }

    pub async fn list(&self) -> Vec<CreditCardAccount> {
        self.cards.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<CreditCardAccount> {
        self.cards.read().await.iter().find(|c| c.id == id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.cards.read().await.iter().any(|c| c.id == id)
    }

    /// Add a card; any `initialAmountUsed` becomes negative opening balance
    pub async fn create(&self, new: NewCreditCard) -> Result<CreditCardAccount> {
        self.errors.clear();
        let result: Result<CreditCardAccount> = async {
            let mut card = new.into_card(String::new());
            validated(card.validate())?;

            let path = self.access.path(Collection::CreditCards).await?;
            card.id = self.access.store().create(&path, encode(&card)?).await?;
            tracing::info!(card_id = %card.id, name = %card.name, "credit card created");

            self.cards.write().await.push(card.clone());
            Ok(card)
        }
        .await;
        self.errors.track("create credit card", result)
    }

    pub async fn update(&self, id: &str, patch: CreditCardPatch) -> Result<CreditCardAccount> {
        self.errors.clear();
        let result: Result<CreditCardAccount> = async {
            let _guard = self.locks.lock([AccountRef::CreditLine(id.to_string())]).await;

            let mut card = self
                .get(id)
                .await
                .ok_or_else(|| Error::not_found(format!("credit card {}", id)))?;
            card.apply_patch(&patch);
            validated(card.validate())?;

            let path = self.access.path(Collection::CreditCards).await?;
            self.access.store().update(&path, id, encode(&card)?).await?;
            tracing::info!(card_id = %id, "credit card updated");

            self.replace_cached(card.clone()).await;
            Ok(card)
        }
        .await;
        self.errors.track("update credit card", result)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.errors.clear();
        let result: Result<()> = async {
            let _guard = self.locks.lock([AccountRef::CreditLine(id.to_string())]).await;
            if !self.contains(id).await {
                return Err(Error::not_found(format!("credit card {}", id)));
            }
            let referenced = self
                .access
                .is_referenced(Collection::Transactions, "accountId", id)
                .await?
                || self
                    .access
                    .is_referenced(Collection::Transfers, "toAccountId", id)
                    .await?;
            if referenced {
                return Err(Error::in_use(format!(
                    "credit card {} still has transactions or transfers",
                    id
                )));
            }

            let path = self.access.path(Collection::CreditCards).await?;
            self.access.store().delete(&path, id).await?;
            tracing::info!(card_id = %id, "credit card deleted");

            self.cards.write().await.retain(|c| c.id != id);
            Ok(())
        }
        .await;
        self.errors.track("delete credit card", result)
    }

    pub async fn set_balance(&self, id: &str, balance: Decimal) -> Result<CreditCardAccount> {
        self.errors.clear();
        let result: Result<CreditCardAccount> = async {
            let _guard = self.locks.lock([AccountRef::CreditLine(id.to_string())]).await;
            self.write_balance(id, round_money(balance)).await
        }
        .await;
        self.errors.track("set credit card balance", result)
    }

    /// Apply one reconciliation effect; caller holds the card lock
    pub(crate) async fn shift_balance(&self, id: &str, effect: &BalanceEffect) -> Result<Decimal> {
        let current = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("credit card {}", id)))?
            .balance;
        let card = self.write_balance(id, effect.apply_to(current)).await?;
        Ok(card.balance)
    }

    async fn write_balance(&self, id: &str, balance: Decimal) -> Result<CreditCardAccount> {
        let mut card = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("credit card {}", id)))?;

        let path = self.access.path(Collection::CreditCards).await?;
        self.access
            .store()
            .update(&path, id, single_field("balance", serde_json::to_value(balance)?))
            .await?;

        card.balance = balance;
        self.replace_cached(card.clone()).await;
        Ok(card)
    }

    async fn replace_cached(&self, card: CreditCardAccount) {
        let mut cards = self.cards.write().await;
        if let Some(slot) = cards.iter_mut().find(|c| c.id == card.id) {
            *slot = card;
        }
    }

    /// `creditLimit + balance` for one card
    pub async fn available_credit(&self, id: &str) -> Result<Decimal> {
        self.get(id)
            .await
            .map(|c| c.available_credit())
            .ok_or_else(|| Error::not_found(format!("credit card {}", id)))
    }

    /// Outstanding debt summed over every card
    pub async fn total_debt(&self) -> Decimal {
        self.cards.read().await.iter().map(|c| c.debt()).sum()
    }
}
