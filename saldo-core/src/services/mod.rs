//! Service layer - business logic orchestration
//!
//! Each store owns one collection and its in-memory cache. The ledgers
//! (transactions, transfers) push balance effects through the reconciler
//! into the account and credit-card stores.

mod account;
mod audit;
mod category;
mod credit_card;
mod loan;
pub mod migration;
mod reconciler;
mod setup;
mod status;
mod store;
mod transaction;
mod transfer;

pub use account::AccountService;
pub use audit::{AuditResult, AuditService, AuditSummary, CheckResult};
pub use category::CategoryService;
pub use credit_card::CreditCardService;
pub use loan::LoanService;
pub use migration::{MigrationResult, MigrationService};
pub use reconciler::{AccountGuard, AccountLocks, Reconciler};
pub use setup::{default_categories, SetupResult, SetupService, DEFAULT_ACCOUNT_COLORS};
pub use status::{AccountSummary, DateRange, StatusService, StatusSummary};
pub use store::{ErrorSlot, StoreAccess, DEFAULT_AUTH_TIMEOUT};
pub use transaction::TransactionService;
pub use transfer::TransferService;
