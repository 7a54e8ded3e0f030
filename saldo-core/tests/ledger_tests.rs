//! Integration tests for the ledgers and balance reconciliation
//!
//! Every test wires a full `SaldoContext` over the in-memory document store,
//! so services talk to each other exactly as they do in the CLI.
//!
//! Run with: cargo test --test ledger_tests -- --nocapture

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_core::adapters::MemoryDocumentStore;
use saldo_core::domain::{
    AccountPatch, NewAccount, NewCreditCard, NewLoan, NewLoanPayment, NewTransaction,
    NewTransfer, TransactionPatch, TransferPatch,
};
use saldo_core::ports::{Collection, DocumentStore};
use saldo_core::session::Session;
use saldo_core::{Category, EntryType, Error, LoanStatus, SaldoContext};

// ============================================================================
// Test Helpers
// ============================================================================

const USER: &str = "user-1";

fn dec(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// Context with one expense and one income category
async fn context() -> (SaldoContext, String, String) {
    let ctx = SaldoContext::in_memory(USER);
    let food = ctx
        .categories
        .create(Category::new("Food", EntryType::Expense, "🍔"))
        .await
        .unwrap();
    let salary = ctx
        .categories
        .create(Category::new("Salary", EntryType::Income, "💰"))
        .await
        .unwrap();
    (ctx, food.id, salary.id)
}

async fn cash(ctx: &SaldoContext, name: &str, balance: i64) -> String {
    ctx.accounts
        .create(NewAccount::new(name, dec(balance)))
        .await
        .unwrap()
        .id
}

async fn card(ctx: &SaldoContext, name: &str, used: i64) -> String {
    let new = NewCreditCard {
        name: name.to_string(),
        credit_limit: dec(1000),
        billing_cycle_day: 10,
        payment_due_day: 25,
        initial_amount_used: Some(dec(used)),
        ..NewCreditCard::default()
    };
    ctx.credit_cards.create(new).await.unwrap().id
}

fn entry(
    entry_type: EntryType,
    amount: i64,
    account_id: &str,
    category_id: &str,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        date,
        category_id: category_id.to_string(),
        account_id: account_id.to_string(),
        amount: dec(amount),
        entry_type,
        details: None,
    }
}

fn transfer(from: &str, to: &str, amount: i64) -> NewTransfer {
    NewTransfer {
        from_account_id: from.to_string(),
        to_account_id: to.to_string(),
        amount: dec(amount),
        date: day(5),
        details: None,
    }
}

async fn cash_balance(ctx: &SaldoContext, id: &str) -> Decimal {
    ctx.accounts.get(id).await.unwrap().balance
}

async fn card_balance(ctx: &SaldoContext, id: &str) -> Decimal {
    ctx.credit_cards.get(id).await.unwrap().balance
}

// ============================================================================
// Transaction Reconciliation
// ============================================================================

#[tokio::test]
async fn test_transaction_lifecycle_keeps_balance_in_step() {
    let (ctx, food, salary) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let expense = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(70));

    let income = ctx
        .transactions
        .create(entry(EntryType::Income, 20, &a, &salary, day(2)))
        .await
        .unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(90));

    let patch = TransactionPatch {
        amount: Some(dec(50)),
        ..TransactionPatch::default()
    };
    ctx.transactions.update(&expense.id, patch).await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(70));

    ctx.transactions.delete(&income.id).await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(50));

    // The persisted document agrees with the cache
    ctx.load_all().await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(50));
}

#[tokio::test]
async fn test_expense_on_card_grows_debt() {
    let (ctx, food, _) = context().await;
    let c = card(&ctx, "Visa", 0).await;

    ctx.transactions
        .create(entry(EntryType::Expense, 45, &c, &food, day(3)))
        .await
        .unwrap();

    assert_eq!(card_balance(&ctx, &c).await, dec(-45));
    assert_eq!(ctx.credit_cards.available_credit(&c).await.unwrap(), dec(955));
}

#[tokio::test]
async fn test_moving_transaction_between_accounts() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 50).await;

    let tx = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();

    let patch = TransactionPatch {
        account_id: Some(b.clone()),
        ..TransactionPatch::default()
    };
    ctx.transactions.update(&tx.id, patch).await.unwrap();

    assert_eq!(cash_balance(&ctx, &a).await, dec(100));
    assert_eq!(cash_balance(&ctx, &b).await, dec(20));
}

#[tokio::test]
async fn test_switching_entry_type_flips_effect() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let tx = ctx
        .transactions
        .create(entry(EntryType::Expense, 10, &a, &food, day(1)))
        .await
        .unwrap();
    let patch = TransactionPatch {
        entry_type: Some(EntryType::Income),
        ..TransactionPatch::default()
    };
    ctx.transactions.update(&tx.id, patch).await.unwrap();

    assert_eq!(cash_balance(&ctx, &a).await, dec(110));
}

#[tokio::test]
async fn test_delete_then_recreate_is_idempotent() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let tx = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();
    ctx.transactions.delete(&tx.id).await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(100));

    ctx.transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(70));
    assert_eq!(ctx.transactions.list().await.len(), 1);
}

#[tokio::test]
async fn test_final_balance_independent_of_order() {
    let ops = [
        (EntryType::Expense, 30),
        (EntryType::Income, 15),
        (EntryType::Expense, 7),
        (EntryType::Income, 120),
    ];

    let mut finals = Vec::new();
    for reversed in [false, true] {
        let (ctx, food, salary) = context().await;
        let a = cash(&ctx, "A", 100).await;
        let ordered: Vec<_> = if reversed {
            ops.iter().rev().collect()
        } else {
            ops.iter().collect()
        };
        for (entry_type, amount) in ordered {
            let category = if *entry_type == EntryType::Income { &salary } else { &food };
            ctx.transactions
                .create(entry(*entry_type, *amount, &a, category, day(1)))
                .await
                .unwrap();
        }
        finals.push(cash_balance(&ctx, &a).await);
    }

    assert_eq!(finals[0], finals[1]);
    assert_eq!(finals[0], dec(198));
}

#[tokio::test]
async fn test_chained_updates_match_single_update() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 100).await;

    let chained = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();
    let direct = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &b, &food, day(1)))
        .await
        .unwrap();

    for amount in [55, 12] {
        let patch = TransactionPatch {
            amount: Some(dec(amount)),
            ..TransactionPatch::default()
        };
        ctx.transactions.update(&chained.id, patch).await.unwrap();
    }
    let patch = TransactionPatch {
        amount: Some(dec(12)),
        ..TransactionPatch::default()
    };
    ctx.transactions.update(&direct.id, patch).await.unwrap();

    assert_eq!(cash_balance(&ctx, &a).await, dec(88));
    assert_eq!(cash_balance(&ctx, &a).await, cash_balance(&ctx, &b).await);
}

#[tokio::test]
async fn test_transaction_rejects_unknown_references_and_negative_amounts() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;

    let result = ctx
        .transactions
        .create(entry(EntryType::Expense, 10, "nope", &food, day(1)))
        .await;
    assert!(matches!(result, Err(Error::Reference(_))));

    let result = ctx
        .transactions
        .create(entry(EntryType::Expense, 10, &a, "nope", day(1)))
        .await;
    assert!(matches!(result, Err(Error::Reference(_))));

    let result = ctx
        .transactions
        .create(entry(EntryType::Expense, -10, &a, &food, day(1)))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(ctx.transactions.last_error().is_some());

    assert_eq!(cash_balance(&ctx, &a).await, dec(100));
    assert!(ctx.transactions.list().await.is_empty());
}

#[tokio::test]
async fn test_transactions_listed_newest_first() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;

    for d in [3, 1, 2] {
        ctx.transactions
            .create(entry(EntryType::Expense, 1, &a, &food, day(d)))
            .await
            .unwrap();
    }

    let dates: Vec<_> = ctx.transactions.list().await.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![day(3), day(2), day(1)]);
}

#[tokio::test]
async fn test_editing_initial_balance_keeps_history() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    ctx.transactions
        .create(entry(EntryType::Expense, 30, &a, &food, day(1)))
        .await
        .unwrap();

    let patch = AccountPatch {
        initial_balance: Some(dec(150)),
        ..AccountPatch::default()
    };
    let account = ctx.accounts.update(&a, patch).await.unwrap();

    assert_eq!(account.balance, dec(120));
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test]
async fn test_transfer_to_card_pays_down_debt() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let c = card(&ctx, "Visa", 20).await;
    assert_eq!(card_balance(&ctx, &c).await, dec(-20));

    ctx.transfers.create(transfer(&a, &c, 40)).await.unwrap();

    assert_eq!(cash_balance(&ctx, &a).await, dec(60));
    assert_eq!(card_balance(&ctx, &c).await, dec(20));
}

#[tokio::test]
async fn test_insufficient_balance_leaves_nothing_behind() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 0).await;

    let result = ctx.transfers.create(transfer(&a, &b, 150)).await;

    match result {
        Err(Error::InsufficientBalance {
            available,
            requested,
        }) => {
            assert_eq!(available, dec(100));
            assert_eq!(requested, dec(150));
        }
        other => panic!("expected InsufficientBalance, got {:?}", other),
    }
    assert_eq!(cash_balance(&ctx, &a).await, dec(100));
    assert_eq!(cash_balance(&ctx, &b).await, dec(0));
    assert!(ctx.transfers.list().await.is_empty());
    assert_eq!(
        ctx.store
            .list_all(&Collection::Transfers.path(USER), None)
            .await
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn test_transfer_endpoints_validated() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let c = card(&ctx, "Visa", 0).await;

    let same = ctx.transfers.create(transfer(&a, &a, 10)).await;
    assert!(matches!(same, Err(Error::Validation(_))));

    let from_card = ctx.transfers.create(transfer(&c, &a, 10)).await;
    assert!(matches!(from_card, Err(Error::Reference(_))));

    let unknown = ctx.transfers.create(transfer(&a, "ghost", 10)).await;
    assert!(matches!(unknown, Err(Error::Reference(_))));
}

#[tokio::test]
async fn test_transfer_update_and_delete_rebalance() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 10).await;
    let c = cash(&ctx, "C", 0).await;

    let t = ctx.transfers.create(transfer(&a, &b, 40)).await.unwrap();

    let patch = TransferPatch {
        to_account_id: Some(c.clone()),
        amount: Some(dec(25)),
        ..TransferPatch::default()
    };
    ctx.transfers.update(&t.id, patch).await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(75));
    assert_eq!(cash_balance(&ctx, &b).await, dec(10));
    assert_eq!(cash_balance(&ctx, &c).await, dec(25));

    ctx.transfers.delete(&t.id).await.unwrap();
    assert_eq!(cash_balance(&ctx, &a).await, dec(100));
    assert_eq!(cash_balance(&ctx, &c).await, dec(0));
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

// ============================================================================
// Referential Integrity
// ============================================================================

#[tokio::test]
async fn test_referenced_records_cannot_be_deleted() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let c = card(&ctx, "Visa", 0).await;

    ctx.transactions
        .create(entry(EntryType::Expense, 10, &a, &food, day(1)))
        .await
        .unwrap();
    ctx.transfers.create(transfer(&a, &c, 10)).await.unwrap();

    assert!(matches!(ctx.accounts.delete(&a).await, Err(Error::InUse(_))));
    assert!(matches!(ctx.credit_cards.delete(&c).await, Err(Error::InUse(_))));
    assert!(matches!(ctx.categories.delete(&food).await, Err(Error::InUse(_))));
    assert!(matches!(ctx.accounts.delete("ghost").await, Err(Error::NotFound(_))));

    let spare = cash(&ctx, "Spare", 0).await;
    ctx.accounts.delete(&spare).await.unwrap();
    assert!(!ctx.accounts.contains(&spare).await);
}

// ============================================================================
// Loans
// ============================================================================

fn loan(origin: &str, amount: i64) -> NewLoan {
    NewLoan {
        borrower: "Marta".to_string(),
        amount: dec(amount),
        origin_account_id: origin.to_string(),
        date: day(1),
        due_date: Some(day(30)),
        details: None,
    }
}

fn payment(account: &str, amount: i64) -> NewLoanPayment {
    NewLoanPayment {
        amount: dec(amount),
        account_id: account.to_string(),
        date: day(10),
        details: None,
    }
}

#[tokio::test]
async fn test_loan_paid_off_in_installments() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 500).await;

    let created = ctx.loans.create(loan(&a, 100)).await.unwrap();
    assert_eq!(created.status, LoanStatus::Active);

    let after_first = ctx.loans.add_payment(&created.id, payment(&a, 30)).await.unwrap();
    assert_eq!(after_first.remaining, dec(70));
    assert_eq!(after_first.status, LoanStatus::Active);

    let after_second = ctx.loans.add_payment(&created.id, payment(&a, 70)).await.unwrap();
    assert_eq!(after_second.remaining, dec(0));
    assert_eq!(after_second.status, LoanStatus::Paid);
    assert_eq!(after_second.payments.len(), 2);

    // Paid loans never reopen
    let late = ctx.loans.add_payment(&created.id, payment(&a, 5)).await;
    assert!(matches!(late, Err(Error::Validation(_))));

    // Loans do not move money on their own
    assert_eq!(cash_balance(&ctx, &a).await, dec(500));
    assert_eq!(ctx.loans.outstanding().await, dec(0));
}

#[tokio::test]
async fn test_forgiven_loan_is_final() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 0).await;
    let created = ctx.loans.create(loan(&a, 80)).await.unwrap();
    assert_eq!(ctx.loans.outstanding().await, dec(80));

    let forgiven = ctx.loans.forgive(&created.id).await.unwrap();
    assert_eq!(forgiven.status, LoanStatus::Forgiven);
    assert_eq!(ctx.loans.outstanding().await, dec(0));

    let result = ctx.loans.add_payment(&created.id, payment(&a, 10)).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_loan_reference_errors() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 0).await;

    assert!(matches!(
        ctx.loans.create(loan("ghost", 10)).await,
        Err(Error::Reference(_))
    ));
    assert!(matches!(
        ctx.loans.add_payment("ghost", payment(&a, 10)).await,
        Err(Error::Reference(_))
    ));
    assert!(matches!(ctx.loans.forgive("ghost").await, Err(Error::NotFound(_))));
    assert!(matches!(ctx.loans.delete("ghost").await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_loan_survives_reload() {
    let (ctx, _, _) = context().await;
    let a = cash(&ctx, "A", 0).await;
    let created = ctx.loans.create(loan(&a, 100)).await.unwrap();
    ctx.loans.add_payment(&created.id, payment(&a, 40)).await.unwrap();

    ctx.load_all().await.unwrap();
    let reloaded = ctx.loans.get(&created.id).await.unwrap();
    assert_eq!(reloaded.remaining, dec(60));
    assert_eq!(reloaded.payments.len(), 1);
    assert_eq!(reloaded.payments[0].loan_id, created.id);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_do_not_lose_updates() {
    let (ctx, food, _) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 100).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let transactions = Arc::clone(&ctx.transactions);
        let transfers = Arc::clone(&ctx.transfers);
        let (a, b, food) = (a.clone(), b.clone(), food.clone());
        handles.push(tokio::spawn(async move {
            transactions
                .create(entry(EntryType::Expense, 1, &a, &food, day(1)))
                .await
                .unwrap();
            // Alternate direction so lock ordering gets exercised
            if i % 2 == 0 {
                transfers.create(transfer(&a, &b, 1)).await.unwrap();
            } else {
                transfers.create(transfer(&b, &a, 1)).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cash_balance(&ctx, &a).await, dec(80));
    assert_eq!(cash_balance(&ctx, &b).await, dec(100));
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

// ============================================================================
// Storage Failures
// ============================================================================

#[tokio::test]
async fn test_rejected_balance_write_keeps_record_and_shows_in_audit() {
    let memory = Arc::new(MemoryDocumentStore::new());
    let store: Arc<dyn DocumentStore> = memory.clone();
    let ctx = SaldoContext::with_store(store, Session::signed_in(USER), Duration::from_secs(1));
    let food = ctx
        .categories
        .create(Category::new("Food", EntryType::Expense, ""))
        .await
        .unwrap();
    let a = cash(&ctx, "A", 100).await;

    memory.fail_writes(Collection::Accounts.path(USER));
    let tx = ctx
        .transactions
        .create(entry(EntryType::Expense, 30, &a, &food.id, day(1)))
        .await;

    // The transaction stands even though its account could not be updated
    assert!(tx.is_ok());
    assert!(ctx.transactions.last_error().is_none());
    assert_eq!(cash_balance(&ctx, &a).await, dec(100));

    let audit = ctx.audit_service.run_checks().await.unwrap();
    assert!(!audit.is_healthy());
    assert_eq!(audit.checks["balance_drift"].status, "error");

    // Direct writes surface the failure to the caller
    let result = ctx.accounts.set_balance(&a, dec(70)).await;
    assert!(matches!(result, Err(Error::Remote(_))));
    assert!(ctx.accounts.last_error().is_some());

    memory.heal();
    ctx.accounts.set_balance(&a, dec(70)).await.unwrap();
    assert!(ctx.accounts.last_error().is_none());
    assert!(ctx.audit_service.run_checks().await.unwrap().is_healthy());
}

#[tokio::test]
async fn test_rejected_record_write_changes_no_balance() {
    let memory = Arc::new(MemoryDocumentStore::new());
    let store: Arc<dyn DocumentStore> = memory.clone();
    let ctx = SaldoContext::with_store(store, Session::signed_in(USER), Duration::from_secs(1));
    let a = cash(&ctx, "A", 100).await;
    let b = cash(&ctx, "B", 0).await;

    memory.fail_writes(Collection::Transfers.path(USER));
    let result = ctx.transfers.create(transfer(&a, &b, 10)).await;

    assert!(matches!(result, Err(Error::Remote(_))));
    assert!(ctx.transfers.last_error().is_some());
    assert_eq!(cash_balance(&ctx, &a).await, dec(100));
    assert_eq!(cash_balance(&ctx, &b).await, dec(0));
}

// ============================================================================
// Session Gating
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_operations_time_out_without_session() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let ctx = SaldoContext::with_store(store, Session::new(), Duration::from_secs(5));

    let result = ctx.accounts.create(NewAccount::new("A", dec(10))).await;

    assert!(matches!(result, Err(Error::AuthTimeout)));
    assert!(ctx.accounts.list().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_operations_resume_once_signed_in() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let ctx = SaldoContext::with_store(store, Session::new(), Duration::from_secs(5));
    let accounts = Arc::clone(&ctx.accounts);

    let pending = tokio::spawn(async move { accounts.create(NewAccount::new("A", dec(10))).await });
    tokio::time::sleep(Duration::from_secs(1)).await;
    ctx.session.sign_in(USER);

    let account = pending.await.unwrap().unwrap();
    assert_eq!(account.balance, dec(10));
}

// ============================================================================
// Setup and Status
// ============================================================================

#[tokio::test]
async fn test_setup_seeds_once() {
    let ctx = SaldoContext::in_memory(USER);

    let first = ctx.setup_service.setup_user().await.unwrap();
    assert!(first.seeded);
    assert_eq!(first.categories, 25);
    assert_eq!(first.accounts, 4);

    let second = ctx.setup_service.setup_user().await.unwrap();
    assert!(!second.seeded);

    ctx.load_all().await.unwrap();
    assert_eq!(ctx.categories.list().await.len(), 25);
    assert_eq!(ctx.categories.list_by_type(EntryType::Income).await.len(), 11);
    let accounts = ctx.accounts.list().await;
    assert_eq!(accounts.len(), 4);
    assert_eq!(accounts[0].name, "Efectivo");
    assert!(accounts.iter().all(|a| a.balance == Decimal::ZERO));
}

#[tokio::test]
async fn test_status_reports_totals() {
    let (ctx, food, salary) = context().await;
    let a = cash(&ctx, "A", 100).await;
    let c = card(&ctx, "Visa", 20).await;
    ctx.transactions
        .create(entry(EntryType::Income, 50, &a, &salary, day(1)))
        .await
        .unwrap();
    ctx.transactions
        .create(entry(EntryType::Expense, 10, &c, &food, day(2)))
        .await
        .unwrap();
    ctx.loans.create(loan(&a, 25)).await.unwrap();

    let status = ctx.status_service.get_status().await;

    assert_eq!(status.total_balance, dec(150));
    assert_eq!(status.total_card_debt, dec(30));
    assert_eq!(status.outstanding_loans, dec(25));
    assert_eq!(status.accounts.len(), 2);
}
