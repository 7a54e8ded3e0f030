//! Balance reconciliation rule
//!
//! Every ledger moves money with the same primitive: an income adds the amount
//! to a cached balance, an expense subtracts it. Transfers decompose into an
//! expense at the source and an income at the destination. Updates are a
//! reversal of the old effect followed by the new one, deletes are the reversal
//! alone. Nothing here performs I/O.

use rust_decimal::{Decimal, RoundingStrategy};

use super::account::AccountRef;
use super::transaction::EntryType;

/// Number of fractional digits kept on every stored amount
pub const MONEY_SCALE: u32 = 2;

/// Round to cents, halves away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `balance + amount` for income, `balance - amount` for expense
pub fn apply(balance: Decimal, entry_type: EntryType, amount: Decimal) -> Decimal {
    round_money(balance + signed_amount(entry_type, amount))
}

pub fn invert(entry_type: EntryType) -> EntryType {
    match entry_type {
        EntryType::Income => EntryType::Expense,
        EntryType::Expense => EntryType::Income,
    }
}

/// Amount with the sign it contributes to a balance
pub fn signed_amount(entry_type: EntryType, amount: Decimal) -> Decimal {
    match entry_type {
        EntryType::Income => amount,
        EntryType::Expense => -amount,
    }
}

/// One balance movement against one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEffect {
    pub account: AccountRef,
    pub entry_type: EntryType,
    pub amount: Decimal,
}

impl BalanceEffect {
    pub fn new(account: AccountRef, entry_type: EntryType, amount: Decimal) -> Self {
        Self {
            account,
            entry_type,
            amount,
        }
    }

    /// The effect that undoes this one
    pub fn reversed(&self) -> Self {
        Self {
            account: self.account.clone(),
            entry_type: invert(self.entry_type),
            amount: self.amount,
        }
    }

    pub fn apply_to(&self, balance: Decimal) -> Decimal {
        apply(balance, self.entry_type, self.amount)
    }

    pub fn signed(&self) -> Decimal {
        signed_amount(self.entry_type, self.amount)
    }
}

pub fn transaction_effect(account: AccountRef, entry_type: EntryType, amount: Decimal) -> BalanceEffect {
    BalanceEffect::new(account, entry_type, amount)
}

/// Source loses the amount, destination gains it, whatever kind it is
pub fn transfer_effects(from: AccountRef, to: AccountRef, amount: Decimal) -> [BalanceEffect; 2] {
    [
        BalanceEffect::new(from, EntryType::Expense, amount),
        BalanceEffect::new(to, EntryType::Income, amount),
    ]
}

/// Effects needed to move from an old record to a new one: undo then redo
pub fn update_effects(old: &[BalanceEffect], new: &[BalanceEffect]) -> Vec<BalanceEffect> {
    old.iter()
        .map(BalanceEffect::reversed)
        .chain(new.iter().cloned())
        .collect()
}

/// Fold the effects that target `account` onto an opening balance
pub fn replay<'a>(
    opening: Decimal,
    account: &AccountRef,
    effects: impl IntoIterator<Item = &'a BalanceEffect>,
) -> Decimal {
    effects
        .into_iter()
        .filter(|e| &e.account == account)
        .fold(round_money(opening), |balance, e| e.apply_to(balance))
}
