//! Account domain models: cash accounts, credit cards and the reference type
//! that tells the two apart

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reconcile::round_money;

/// A cash account owned by the user
///
/// `balance` is `initial_balance` plus the net effect of every live
/// transaction and transfer that references this account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub initial_balance: Decimal,
    pub balance: Decimal,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_total: Option<bool>,
}

impl Account {
    /// Whether this account counts toward the overall total (default: yes)
    pub fn counts_in_total(&self) -> bool {
        self.include_in_total.unwrap_or(true)
    }

    /// Apply a partial update, shifting `balance` when `initial_balance` moves
    pub fn apply_patch(&mut self, patch: &AccountPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(order) = patch.order {
            self.order = Some(order);
        }
        if let Some(include) = patch.include_in_total {
            self.include_in_total = Some(include);
        }
        if let Some(initial) = patch.initial_balance {
            let initial = round_money(initial);
            self.balance = round_money(self.balance + (initial - self.initial_balance));
            self.initial_balance = initial;
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("account name cannot be empty");
        }
        Ok(())
    }
}

/// Input for creating a cash account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub initial_balance: Decimal,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub include_in_total: Option<bool>,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, initial_balance: Decimal) -> Self {
        Self {
            name: name.into(),
            initial_balance,
            ..Self::default()
        }
    }

    /// Build the account record; the balance starts at the initial balance
    pub fn into_account(self, id: impl Into<String>) -> Account {
        let initial = round_money(self.initial_balance);
        Account {
            id: id.into(),
            name: self.name,
            initial_balance: initial,
            balance: initial,
            color: self.color,
            order: self.order,
            include_in_total: self.include_in_total,
        }
    }
}

/// Partial update for a cash account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_in_total: Option<bool>,
}

/// Card network of a credit card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardType {
    Visa,
    MasterCard,
    #[serde(rename = "American Express")]
    AmericanExpress,
    Discover,
    #[default]
    Other,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::MasterCard => "MasterCard",
            Self::AmericanExpress => "American Express",
            Self::Discover => "Discover",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "visa" => Self::Visa,
            "mastercard" => Self::MasterCard,
            "americanexpress" | "amex" => Self::AmericanExpress,
            "discover" => Self::Discover,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credit card; `balance` is negative while debt is outstanding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardAccount {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub initial_balance: Decimal,
    pub balance: Decimal,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_total: Option<bool>,
    pub credit_limit: Decimal,
    #[serde(default)]
    pub card_type: CardType,
    pub billing_cycle_day: u8,
    pub payment_due_day: u8,
}

impl CreditCardAccount {
    /// Credit still available: the limit minus what is owed
    pub fn available_credit(&self) -> Decimal {
        round_money(self.credit_limit + self.balance)
    }

    /// Outstanding debt as a positive number (zero when in credit)
    pub fn debt(&self) -> Decimal {
        if self.balance < Decimal::ZERO {
            -self.balance
        } else {
            Decimal::ZERO
        }
    }

    pub fn apply_patch(&mut self, patch: &CreditCardPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(order) = patch.order {
            self.order = Some(order);
        }
        if let Some(include) = patch.include_in_total {
            self.include_in_total = Some(include);
        }
        if let Some(limit) = patch.credit_limit {
            self.credit_limit = round_money(limit);
        }
        if let Some(card_type) = patch.card_type {
            self.card_type = card_type;
        }
        if let Some(day) = patch.billing_cycle_day {
            self.billing_cycle_day = day;
        }
        if let Some(day) = patch.payment_due_day {
            self.payment_due_day = day;
        }
        if let Some(used) = patch.initial_amount_used {
            let initial = opening_debt(used);
            self.balance = round_money(self.balance + (initial - self.initial_balance));
            self.initial_balance = initial;
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("card name cannot be empty");
        }
        validate_card_terms(self.credit_limit, self.billing_cycle_day, self.payment_due_day)
    }
}

/// Input for creating a credit card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreditCard {
    pub name: String,
    pub credit_limit: Decimal,
    #[serde(default)]
    pub card_type: CardType,
    pub billing_cycle_day: u8,
    pub payment_due_day: u8,
    /// Debt already on the card when it is added, as a positive amount
    #[serde(default)]
    pub initial_amount_used: Option<Decimal>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub include_in_total: Option<bool>,
}

impl NewCreditCard {
    pub fn into_card(self, id: impl Into<String>) -> CreditCardAccount {
        let initial = self.initial_amount_used.map(opening_debt).unwrap_or(Decimal::ZERO);
        CreditCardAccount {
            id: id.into(),
            name: self.name,
            initial_balance: initial,
            balance: initial,
            color: self.color,
            order: self.order,
            include_in_total: self.include_in_total,
            credit_limit: round_money(self.credit_limit),
            card_type: self.card_type,
            billing_cycle_day: self.billing_cycle_day,
            payment_due_day: self.payment_due_day,
        }
    }
}

/// Partial update for a credit card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_cycle_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_day: Option<u8>,
    /// Replaces the opening debt; the balance shifts by the difference
    #[serde(skip)]
    pub initial_amount_used: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_in_total: Option<bool>,
}

/// Opening debt is stored negative regardless of the sign it was entered with
fn opening_debt(used: Decimal) -> Decimal {
    -round_money(used.abs())
}

fn validate_card_terms(limit: Decimal, billing_day: u8, due_day: u8) -> Result<(), &'static str> {
    if limit <= Decimal::ZERO {
        return Err("credit limit must be greater than zero");
    }
    if !(1..=31).contains(&billing_day) {
        return Err("billing cycle day must be between 1 and 31");
    }
    if !(1..=31).contains(&due_day) {
        return Err("payment due day must be between 1 and 31");
    }
    Ok(())
}

/// Which store owns an account id
///
/// Ledgers resolve a raw id to an `AccountRef` once, at the boundary, and use
/// it for every balance touch afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum AccountRef {
    Cash(String),
    CreditLine(String),
}

impl AccountRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Cash(id) | Self::CreditLine(id) => id,
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash(_))
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash(id) => write!(f, "account {}", id),
            Self::CreditLine(id) => write!(f, "credit card {}", id),
        }
    }
}
