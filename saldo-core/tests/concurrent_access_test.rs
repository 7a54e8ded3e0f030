//! Overlapping ledger and store operations on the same records
//!
//! A `SlowStore` stretches every write so that concurrent calls really do
//! interleave at the storage boundary.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use saldo_core::adapters::MemoryDocumentStore;
use saldo_core::domain::{
    NewAccount, NewTransaction, NewTransfer, TransactionPatch, TransferPatch,
};
use saldo_core::ports::{Collection, Document, DocumentStore, Fields, OrderBy};
use saldo_core::session::Session;
use saldo_core::{Category, EntryType, Error, Result, SaldoContext};

// ============================================================================
// Test Helpers
// ============================================================================

const USER: &str = "user-1";
const DELAY: Duration = Duration::from_millis(30);

/// Memory store whose writes and lookups each take `DELAY`
#[derive(Default)]
struct SlowStore {
    inner: MemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn list_all(&self, path: &str, order_by: Option<&OrderBy>) -> Result<Vec<Document>> {
        self.inner.list_all(path, order_by).await
    }

    async fn get_one(&self, path: &str, id: &str) -> Result<Option<Document>> {
        self.inner.get_one(path, id).await
    }

    async fn create(&self, path: &str, data: Fields) -> Result<String> {
        tokio::time::sleep(DELAY).await;
        self.inner.create(path, data).await
    }

    async fn set(&self, path: &str, id: &str, data: Fields) -> Result<()> {
        tokio::time::sleep(DELAY).await;
        self.inner.set(path, id, data).await
    }

    async fn update(&self, path: &str, id: &str, partial: Fields) -> Result<()> {
        tokio::time::sleep(DELAY).await;
        self.inner.update(path, id, partial).await
    }

    async fn delete(&self, path: &str, id: &str) -> Result<()> {
        tokio::time::sleep(DELAY).await;
        self.inner.delete(path, id).await
    }

    async fn find_where(&self, path: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        tokio::time::sleep(DELAY).await;
        self.inner.find_where(path, field, value).await
    }
}

fn dec(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

/// Context over a slow store with one expense category
async fn context() -> (Arc<SaldoContext>, String) {
    let store: Arc<dyn DocumentStore> = Arc::new(SlowStore::default());
    let ctx = SaldoContext::with_store(store, Session::signed_in(USER), Duration::from_secs(5));
    let food = ctx
        .categories
        .create(Category::new("Food", EntryType::Expense, ""))
        .await
        .unwrap();
    (Arc::new(ctx), food.id)
}

async fn cash(ctx: &SaldoContext, name: &str, balance: i64) -> String {
    ctx.accounts
        .create(NewAccount::new(name, dec(balance)))
        .await
        .unwrap()
        .id
}

fn expense(account_id: &str, category_id: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        date: date(),
        category_id: category_id.to_string(),
        account_id: account_id.to_string(),
        amount: dec(amount),
        entry_type: EntryType::Expense,
        details: None,
    }
}

fn transfer(from: &str, to: &str, amount: i64) -> NewTransfer {
    NewTransfer {
        from_account_id: from.to_string(),
        to_account_id: to.to_string(),
        amount: dec(amount),
        date: date(),
        details: None,
    }
}

async fn balance(ctx: &SaldoContext, id: &str) -> Decimal {
    ctx.accounts.get(id).await.unwrap().balance
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn test_overlapping_transaction_deletes_reverse_once() {
    let (ctx, food) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let tx = ctx.transactions.create(expense(&a, &food, 30)).await.unwrap();
    assert_eq!(balance(&ctx, &a).await, dec(70));

    let first = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let id = tx.id.clone();
        async move { ctx.transactions.delete(&id).await }
    });
    let second = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let id = tx.id.clone();
        async move { ctx.transactions.delete(&id).await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Err(Error::NotFound(_)))));
    assert_eq!(balance(&ctx, &a).await, dec(100));
}

#[tokio::test]
async fn test_overlapping_transaction_updates_stay_consistent() {
    let (ctx, food) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let tx = ctx.transactions.create(expense(&a, &food, 30)).await.unwrap();

    let mut handles = Vec::new();
    for amount in [50, 60] {
        let ctx = Arc::clone(&ctx);
        let id = tx.id.clone();
        handles.push(tokio::spawn(async move {
            let patch = TransactionPatch {
                amount: Some(dec(amount)),
                ..TransactionPatch::default()
            };
            ctx.transactions.update(&id, patch).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Whichever update landed last, the balance reflects exactly that amount
    let stored = ctx.transactions.load().await.unwrap();
    let amount = stored[0].amount;
    assert!(amount == dec(50) || amount == dec(60));
    assert_eq!(balance(&ctx, &a).await, dec(100) - amount);
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

#[tokio::test]
async fn test_update_and_delete_of_same_transaction() {
    let (ctx, food) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let tx = ctx.transactions.create(expense(&a, &food, 30)).await.unwrap();

    let update = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let id = tx.id.clone();
        async move {
            let patch = TransactionPatch {
                amount: Some(dec(45)),
                ..TransactionPatch::default()
            };
            ctx.transactions.update(&id, patch).await.map(|_| ())
        }
    });
    let delete = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let id = tx.id.clone();
        async move { ctx.transactions.delete(&id).await }
    });
    let _ = update.await.unwrap();
    delete.await.unwrap().unwrap();

    assert!(ctx.transactions.list().await.is_empty());
    assert_eq!(balance(&ctx, &a).await, dec(100));
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test]
async fn test_overlapping_transfer_deletes_reverse_once() {
    let (ctx, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 0).await;
    let t = ctx.transfers.create(transfer(&a, &b, 40)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..2 {
        let ctx = Arc::clone(&ctx);
        let id = t.id.clone();
        handles.push(tokio::spawn(async move { ctx.transfers.delete(&id).await }));
    }
    let mut deleted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => deleted += 1,
            Err(e) => assert!(matches!(e, Error::NotFound(_)), "unexpected {:?}", e),
        }
    }

    assert_eq!(deleted, 1);
    assert_eq!(balance(&ctx, &a).await, dec(100));
    assert_eq!(balance(&ctx, &b).await, dec(0));
}

#[tokio::test]
async fn test_overlapping_transfer_updates_stay_consistent() {
    let (ctx, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 0).await;
    let t = ctx.transfers.create(transfer(&a, &b, 40)).await.unwrap();

    let mut handles = Vec::new();
    for amount in [10, 25] {
        let ctx = Arc::clone(&ctx);
        let id = t.id.clone();
        handles.push(tokio::spawn(async move {
            let patch = TransferPatch {
                amount: Some(dec(amount)),
                ..TransferPatch::default()
            };
            ctx.transfers.update(&id, patch).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let amount = ctx.transfers.load().await.unwrap()[0].amount;
    assert_eq!(balance(&ctx, &a).await, dec(100) - amount);
    assert_eq!(balance(&ctx, &b).await, amount);
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

// ============================================================================
// Account Deletion
// ============================================================================

#[tokio::test]
async fn test_create_waiting_on_deleted_account_is_rejected() {
    let (ctx, food) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let delete = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let a = a.clone();
        async move { ctx.accounts.delete(&a).await }
    });
    // Let the delete take the account lock first
    tokio::time::sleep(DELAY / 3).await;
    let created = ctx.transactions.create(expense(&a, &food, 10)).await;

    delete.await.unwrap().unwrap();
    assert!(matches!(created, Err(Error::Reference(_))));
    assert!(ctx.transactions.list().await.is_empty());
    assert!(ctx
        .store
        .list_all(&Collection::Transactions.path(USER), None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_waiting_on_create_sees_new_record() {
    let (ctx, food) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let create = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let (a, food) = (a.clone(), food.clone());
        async move { ctx.transactions.create(expense(&a, &food, 10)).await }
    });
    // Let the create take the account lock first
    tokio::time::sleep(DELAY / 3).await;
    let deleted = ctx.accounts.delete(&a).await;

    create.await.unwrap().unwrap();
    assert!(matches!(deleted, Err(Error::InUse(_))));
    assert_eq!(balance(&ctx, &a).await, dec(90));
}

#[tokio::test]
async fn test_transfer_to_card_deleted_meanwhile_is_rejected() {
    let (ctx, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let card = ctx
        .credit_cards
        .create(saldo_core::domain::NewCreditCard {
            name: "Visa".to_string(),
            credit_limit: dec(500),
            billing_cycle_day: 5,
            payment_due_day: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    let delete = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let id = card.id.clone();
        async move { ctx.credit_cards.delete(&id).await }
    });
    tokio::time::sleep(DELAY / 3).await;
    let moved = ctx.transfers.create(transfer(&a, &card.id, 20)).await;

    delete.await.unwrap().unwrap();
    assert!(matches!(moved, Err(Error::Reference(_))));
    assert_eq!(balance(&ctx, &a).await, dec(100));
}
