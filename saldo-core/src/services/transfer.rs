//! Transfer ledger - moves money out of a cash account into an account or card

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::reconcile::{transfer_effects, update_effects};
use crate::domain::result::{Error, Result};
use crate::domain::{
    validate_amount, AccountRef, BalanceEffect, EntryType, NewTransfer, Transfer, TransferPatch,
};
use crate::ports::{encode, Collection, OrderBy};

use super::reconciler::Reconciler;
use super::store::{validated, ErrorSlot, StoreAccess};

pub struct TransferService {
    access: StoreAccess,
    reconciler: Arc<Reconciler>,
    transfers: RwLock<Vec<Transfer>>,
    /// Serializes update and delete so each sees the record it replaces
    writes: Mutex<()>,
    errors: ErrorSlot,
}

fn sort_newest_first(transfers: &mut [Transfer]) {
    transfers.sort_by(|a, b| b.date.cmp(&a.date));
}

fn check_endpoints(transfer: &Transfer) -> Result<()> {
    if transfer.from_account_id == transfer.to_account_id {
        return Err(Error::validation("source and destination must differ"));
    }
    Ok(())
}

impl TransferService {
    pub fn new(access: StoreAccess, reconciler: Arc<Reconciler>) -> Self {
        Self {
            access,
            reconciler,
            transfers: RwLock::new(Vec::new()),
            writes: Mutex::new(()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    pub async fn load(&self) -> Result<Vec<Transfer>> {
        self.errors.clear();
        let result: Result<Vec<Transfer>> = async {
            let path = self.access.path(Collection::Transfers).await?;
            let docs = self
                .access
                .store()
                .list_all(&path, Some(&OrderBy::desc("date")))
                .await?;
            let transfers = docs
                .into_iter()
                .map(|d| d.decode::<Transfer>())
                .collect::<Result<Vec<_>>>()?;
            *self.transfers.write().await = transfers.clone();
            Ok(transfers)
        }
        .await;
        self.errors.track("load transfers", result)
    }

    pub async fn list(&self) -> Vec<Transfer> {
        self.transfers.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Transfer> {
        self.transfers.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn list_for_account(&self, account_id: &str) -> Vec<Transfer> {
        self.transfers
            .read()
            .await
            .iter()
            .filter(|t| t.touches(account_id))
            .cloned()
            .collect()
    }

    /// Move money between accounts
    ///
    /// The source must be a cash account holding at least `amount`; the
    /// destination may be cash or a credit card and always gains `amount`.
    pub async fn create(&self, new: NewTransfer) -> Result<Transfer> {
        self.errors.clear();
        let result = self.create_inner(new).await;
        self.errors.track("create transfer", result)
    }

    async fn create_inner(&self, new: NewTransfer) -> Result<Transfer> {
        validated(validate_amount(new.amount))?;
        let mut transfer = new.into_transfer(String::new());
        check_endpoints(&transfer)?;
        let from = self.reconciler.require_cash(&transfer.from_account_id).await?;
        let to = self.reconciler.require(&transfer.to_account_id).await?;

        let _guard = self.reconciler.lock([from.clone(), to.clone()]).await;
        self.reconciler.confirm(&[from.clone(), to.clone()]).await?;

        let available = self.reconciler.balance(&from).await.unwrap_or_default();
        if available < transfer.amount {
            return Err(Error::InsufficientBalance {
                available,
                requested: transfer.amount,
            });
        }

        let path = self.access.path(Collection::Transfers).await?;
        transfer.id = self
            .access
            .store()
            .create(&path, encode(&transfer)?)
            .await?;
        tracing::info!(
            transfer_id = %transfer.id,
            from = %from,
            to = %to,
            amount = %transfer.amount,
            "transfer created"
        );

        {
            let mut transfers = self.transfers.write().await;
            transfers.push(transfer.clone());
            sort_newest_first(&mut transfers);
        }

        self.reconciler
            .apply(&transfer_effects(from, to, transfer.amount))
            .await;
        Ok(transfer)
    }

    /// Rewrite a transfer; the new source balance is not re-checked
    pub async fn update(&self, id: &str, patch: TransferPatch) -> Result<Transfer> {
        self.errors.clear();
        let result = self.update_inner(id, patch).await;
        self.errors.track("update transfer", result)
    }

    async fn update_inner(&self, id: &str, patch: TransferPatch) -> Result<Transfer> {
        let _write = self.writes.lock().await;
        let old = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("transfer {}", id)))?;
        let new = old.patched(&patch);
        validated(validate_amount(new.amount))?;
        check_endpoints(&new)?;
        let from = self.reconciler.require_cash(&new.from_account_id).await?;
        let to = self.reconciler.require(&new.to_account_id).await?;
        let old_effects = self.previous_effects(&old).await;

        let touched: Vec<AccountRef> = old_effects
            .iter()
            .map(|e| e.account.clone())
            .chain([from.clone(), to.clone()])
            .collect();
        let _guard = self.reconciler.lock(touched).await;
        self.reconciler.confirm(&[from.clone(), to.clone()]).await?;

        let path = self.access.path(Collection::Transfers).await?;
        self.access.store().update(&path, id, encode(&new)?).await?;
        tracing::info!(transfer_id = %id, from = %from, to = %to, "transfer updated");

        {
            let mut transfers = self.transfers.write().await;
            if let Some(slot) = transfers.iter_mut().find(|t| t.id == id) {
                *slot = new.clone();
            }
            sort_newest_first(&mut transfers);
        }

        let new_effects = transfer_effects(from, to, new.amount);
        self.reconciler
            .apply(&update_effects(&old_effects, &new_effects))
            .await;
        Ok(new)
    }

    /// Remove a transfer and give the money back to its source
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.errors.clear();
        let result = self.delete_inner(id).await;
        self.errors.track("delete transfer", result)
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        let _write = self.writes.lock().await;
        let old = self
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("transfer {}", id)))?;
        let old_effects = self.previous_effects(&old).await;

        let _guard = self
            .reconciler
            .lock(old_effects.iter().map(|e| e.account.clone()))
            .await;

        let path = self.access.path(Collection::Transfers).await?;
        self.access.store().delete(&path, id).await?;
        tracing::info!(transfer_id = %id, "transfer deleted");

        self.transfers.write().await.retain(|t| t.id != id);

        let reversal: Vec<BalanceEffect> = old_effects.iter().map(BalanceEffect::reversed).collect();
        self.reconciler.apply(&reversal).await;
        Ok(())
    }

    /// Effects a stored transfer had; endpoints that vanished are skipped
    async fn previous_effects(&self, transfer: &Transfer) -> Vec<BalanceEffect> {
        let from = self.reconciler.resolve(&transfer.from_account_id).await;
        let to = self.reconciler.resolve(&transfer.to_account_id).await;
        if from.is_none() || to.is_none() {
            tracing::warn!(
                transfer_id = %transfer.id,
                "transfer endpoint no longer exists, reversing what remains"
            );
        }

        let mut effects = Vec::with_capacity(2);
        if let Some(from) = from {
            effects.push(BalanceEffect::new(from, EntryType::Expense, transfer.amount));
        }
        if let Some(to) = to {
            effects.push(BalanceEffect::new(to, EntryType::Income, transfer.amount));
        }
        effects
    }
}
