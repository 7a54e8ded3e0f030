//! Core domain entities
//!
//! Pure data structures, validation and the balance reconciliation rule.
//! No I/O or storage concerns live here.

mod account;
mod category;
mod loan;
pub mod reconcile;
pub mod result;
mod transaction;
mod transfer;
mod user;

pub use account::{
    Account, AccountPatch, AccountRef, CardType, CreditCardAccount, CreditCardPatch, NewAccount,
    NewCreditCard,
};
pub use category::{Category, CategoryPatch};
pub use loan::{Loan, LoanPayment, LoanStatus, NewLoan, NewLoanPayment};
pub use reconcile::BalanceEffect;
pub use transaction::{
    monthly_totals, validate_amount, EntryType, MonthlyTotals, NewTransaction, Transaction,
    TransactionPatch,
};
pub use transfer::{NewTransfer, Transfer, TransferPatch};
pub use user::UserProfile;
