//! Loan ledger - money lent out and repaid over time
//!
//! Loans and their payments are bookkeeping only: recording them never moves
//! an account balance.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::reconcile::round_money;
use crate::domain::result::{Error, Result};
use crate::domain::{Loan, LoanStatus, NewLoan, NewLoanPayment};
use crate::ports::{encode, Collection, Fields, OrderBy};

use super::reconciler::Reconciler;
use super::store::{validated, ErrorSlot, StoreAccess};

pub struct LoanService {
    access: StoreAccess,
    reconciler: Arc<Reconciler>,
    loans: RwLock<Vec<Loan>>,
    /// Serializes read-modify-write of a loan document
    writes: Mutex<()>,
    errors: ErrorSlot,
}

impl LoanService {
    pub fn new(access: StoreAccess, reconciler: Arc<Reconciler>) -> Self {
        Self {
            access,
            reconciler,
            loans: RwLock::new(Vec::new()),
            writes: Mutex::new(()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    /// Fetch every loan, oldest first
    pub async fn load(&self) -> Result<Vec<Loan>> {
        self.errors.clear();
        let result: Result<Vec<Loan>> = async {
            let path = self.access.path(Collection::Loans).await?;
            let docs = self
                .access
                .store()
                .list_all(&path, Some(&OrderBy::asc("order")))
                .await?;
            let loans = docs
                .into_iter()
                .map(|d| d.decode::<Loan>())
                .collect::<Result<Vec<_>>>()?;
            *self.loans.write().await = loans.clone();
            Ok(loans)
        }
        .await;
        self.errors.track("load loans", result)
    }

    pub async fn list(&self) -> Vec<Loan> {
        self.loans.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Loan> {
        self.loans.read().await.iter().find(|l| l.id == id).cloned()
    }

    /// Principal still owed across active loans
    pub async fn outstanding(&self) -> Decimal {
        round_money(
            self.loans
                .read()
                .await
                .iter()
                .filter(|l| l.status == LoanStatus::Active)
                .map(|l| l.remaining)
                .sum(),
        )
    }

    pub async fn create(&self, new: NewLoan) -> Result<Loan> {
        self.errors.clear();
        let result: Result<Loan> = async {
            validated(new.validate())?;
            self.reconciler.require(&new.origin_account_id).await?;

            let mut loan = new.into_loan(String::new(), Utc::now().timestamp_millis());
            let path = self.access.path(Collection::Loans).await?;
            loan.id = self.access.store().create(&path, encode(&loan)?).await?;
            tracing::info!(loan_id = %loan.id, borrower = %loan.borrower, amount = %loan.amount, "loan created");

            self.loans.write().await.push(loan.clone());
            Ok(loan)
        }
        .await;
        self.errors.track("create loan", result)
    }

    /// Record a repayment; the loan is marked paid once nothing remains
    pub async fn add_payment(&self, loan_id: &str, payment: NewLoanPayment) -> Result<Loan> {
        self.errors.clear();
        let result: Result<Loan> = async {
            let _write = self.writes.lock().await;

            let mut loan = self
                .get(loan_id)
                .await
                .ok_or_else(|| Error::reference(format!("loan {} does not exist", loan_id)))?;
            let payment = payment.into_payment(Uuid::new_v4().simple().to_string(), loan_id);
            loan.apply_payment(payment).map_err(Error::validation)?;

            let mut partial = Fields::new();
            partial.insert("remaining".to_string(), serde_json::to_value(loan.remaining)?);
            partial.insert("status".to_string(), serde_json::to_value(loan.status)?);
            partial.insert("payments".to_string(), serde_json::to_value(&loan.payments)?);
            self.persist(loan_id, partial).await?;
            tracing::info!(loan_id = %loan_id, remaining = %loan.remaining, status = %loan.status, "loan payment recorded");

            self.replace_cached(loan.clone()).await;
            Ok(loan)
        }
        .await;
        self.errors.track("add loan payment", result)
    }

    /// Write the loan off, whatever its state
    pub async fn forgive(&self, loan_id: &str) -> Result<Loan> {
        self.errors.clear();
        let result: Result<Loan> = async {
            let _write = self.writes.lock().await;

            let mut loan = self
                .get(loan_id)
                .await
                .ok_or_else(|| Error::not_found(format!("loan {}", loan_id)))?;
            loan.forgive();

            let mut partial = Fields::new();
            partial.insert("status".to_string(), serde_json::to_value(loan.status)?);
            self.persist(loan_id, partial).await?;
            tracing::info!(loan_id = %loan_id, "loan forgiven");

            self.replace_cached(loan.clone()).await;
            Ok(loan)
        }
        .await;
        self.errors.track("forgive loan", result)
    }

    pub async fn delete(&self, loan_id: &str) -> Result<()> {
        self.errors.clear();
        let result: Result<()> = async {
            let _write = self.writes.lock().await;

            if self.get(loan_id).await.is_none() {
                return Err(Error::not_found(format!("loan {}", loan_id)));
            }
            let path = self.access.path(Collection::Loans).await?;
            self.access.store().delete(&path, loan_id).await?;
            tracing::info!(loan_id = %loan_id, "loan deleted");

            self.loans.write().await.retain(|l| l.id != loan_id);
            Ok(())
        }
        .await;
        self.errors.track("delete loan", result)
    }

    async fn persist(&self, loan_id: &str, partial: Fields) -> Result<()> {
        let path = self.access.path(Collection::Loans).await?;
        self.access.store().update(&path, loan_id, partial).await
    }

    async fn replace_cached(&self, loan: Loan) {
        let mut loans = self.loans.write().await;
        if let Some(slot) = loans.iter_mut().find(|l| l.id == loan.id) {
            *slot = loan;
        }
    }
}
