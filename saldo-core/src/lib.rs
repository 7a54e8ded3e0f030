//! Saldo Core - personal finance ledger with balance reconciliation
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities and the pure reconciliation rule
//! - **ports**: Trait definitions for external dependencies (DocumentStore)
//! - **services**: Stores and ledgers that own collections and their caches
//! - **adapters**: Concrete document stores (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;
pub mod session;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use adapters::{DuckDbDocumentStore, MemoryDocumentStore};
use config::Config;
use ports::DocumentStore;
use services::*;
use session::Session;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    Account, AccountRef, CardType, Category, CreditCardAccount, EntryType, Loan, LoanStatus,
    Transaction, Transfer,
};

/// Main context for Saldo operations
///
/// Owns the identity session and every store, wired to one document store.
pub struct SaldoContext {
    pub config: Config,
    pub session: Session,
    pub store: Arc<dyn DocumentStore>,
    pub accounts: Arc<AccountService>,
    pub credit_cards: Arc<CreditCardService>,
    pub categories: Arc<CategoryService>,
    pub transactions: Arc<TransactionService>,
    pub transfers: Arc<TransferService>,
    pub loans: Arc<LoanService>,
    pub setup_service: SetupService,
    pub audit_service: AuditService,
    pub status_service: StatusService,
}

impl SaldoContext {
    /// Open the DuckDB database in `saldo_dir` and sign in the configured user
    pub fn new(saldo_dir: &Path) -> Result<Self> {
        let config = Config::load(saldo_dir)?;
        std::fs::create_dir_all(saldo_dir)?;

        let db_path = saldo_dir.join(config::DB_FILENAME);
        let store: Arc<dyn DocumentStore> = Arc::new(DuckDbDocumentStore::new(&db_path)?);
        tracing::debug!(db = %db_path.display(), "database opened");

        let session = Session::signed_in(config.user_id.clone());
        Ok(Self::assemble(config, store, session))
    }

    /// In-memory context already signed in as `user_id`
    pub fn in_memory(user_id: &str) -> Self {
        let config = Config {
            user_id: user_id.to_string(),
            ..Config::default()
        };
        let session = Session::signed_in(user_id);
        Self::assemble(config, Arc::new(MemoryDocumentStore::new()), session)
    }

    /// Wire services over an existing store and session
    pub fn with_store(store: Arc<dyn DocumentStore>, session: Session, auth_timeout: Duration) -> Self {
        let config = Config {
            auth_timeout,
            ..Config::default()
        };
        Self::assemble(config, store, session)
    }

    fn assemble(config: Config, store: Arc<dyn DocumentStore>, session: Session) -> Self {
        let access = StoreAccess::new(Arc::clone(&store), session.handle(), config.auth_timeout);
        let locks = Arc::new(AccountLocks::new());

        let accounts = Arc::new(AccountService::new(access.clone(), Arc::clone(&locks)));
        let credit_cards = Arc::new(CreditCardService::new(access.clone(), Arc::clone(&locks)));
        let categories = Arc::new(CategoryService::new(access.clone()));
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&accounts),
            Arc::clone(&credit_cards),
            locks,
        ));
        let transactions = Arc::new(TransactionService::new(
            access.clone(),
            Arc::clone(&reconciler),
            Arc::clone(&categories),
        ));
        let transfers = Arc::new(TransferService::new(access.clone(), Arc::clone(&reconciler)));
        let loans = Arc::new(LoanService::new(access.clone(), reconciler));

        let setup_service = SetupService::new(access.clone());
        let audit_service = AuditService::new(access);
        let status_service = StatusService::new(
            Arc::clone(&accounts),
            Arc::clone(&credit_cards),
            Arc::clone(&categories),
            Arc::clone(&transactions),
            Arc::clone(&transfers),
            Arc::clone(&loans),
        );

        Self {
            config,
            session,
            store,
            accounts,
            credit_cards,
            categories,
            transactions,
            transfers,
            loans,
            setup_service,
            audit_service,
            status_service,
        }
    }

    /// Fill every store cache from the document store
    pub async fn load_all(&self) -> Result<()> {
        tokio::try_join!(
            self.accounts.load(),
            self.credit_cards.load(),
            self.categories.load(),
            self.transactions.load(),
            self.transfers.load(),
            self.loans.load(),
        )?;
        Ok(())
    }
}
