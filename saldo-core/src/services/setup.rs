//! Setup service - seeds a new user's collections
//!
//! A user counts as set up once `users/{userId}` exists. Default categories
//! and accounts use their name as document id, so re-running the seed never
//! duplicates anything.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Category, EntryType, NewAccount, UserProfile};
use crate::ports::{encode, Collection, USERS_COLLECTION};

use super::store::{ErrorSlot, StoreAccess};

const DEFAULT_INCOME_CATEGORIES: &[(&str, &str)] = &[
    ("Arriendos", "🏠"),
    ("Bonos", "🎯"),
    ("Cobro de préstamos", "↪️"),
    ("Comisiones", "💼"),
    ("Encargos", "⚓"),
    ("Fondos de reserva", "🛡️"),
    ("Interés", "📊"),
    ("Préstamos", "↩️"),
    ("Regalos", "🎁"),
    ("Sueldo", "💰"),
    ("Ventas", "🛒"),
];

const DEFAULT_EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("Ahorro", "💰"),
    ("Alimentación", "🍔"),
    ("Contribución", "🤝"),
    ("Costos bancarios", "🏦"),
    ("Cursos", "🎓"),
    ("Educación", "📚"),
    ("Entretenimiento", "🎬"),
    ("Vestimenta", "👗"),
    ("Gastos personales", "🧴"),
    ("Otros", "📦"),
    ("Salud", "🏥"),
    ("Tarjeta de crédito", "💳"),
    ("Transporte", "🚗"),
    ("Vivienda", "🏠"),
];

/// Palette for seeded accounts, in seeding order
pub const DEFAULT_ACCOUNT_COLORS: &[&str] = &[
    "#60A5FA", "#34D399", "#FCD34D", "#FB7185", "#A78BFA", "#F472B6",
];

const DEFAULT_ACCOUNTS: &[&str] = &[
    "Efectivo",
    "Cuenta de Ahorros",
    "Inversiones",
    "Fondo de Emergencia",
];

/// Every default category, income first
pub fn default_categories() -> Vec<Category> {
    let income = DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|(name, icon)| (EntryType::Income, name, icon));
    let expense = DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|(name, icon)| (EntryType::Expense, name, icon));

    income
        .chain(expense)
        .map(|(entry_type, name, icon)| {
            let mut category = Category::new(*name, entry_type, *icon);
            category.id = name.to_string();
            category
        })
        .collect()
}

/// Outcome of `setup_user`
#[derive(Debug, Clone, Serialize)]
pub struct SetupResult {
    pub user_id: String,
    /// False when the user already existed and nothing was written
    pub seeded: bool,
    pub categories: usize,
    pub accounts: usize,
}

pub struct SetupService {
    access: StoreAccess,
    errors: ErrorSlot,
}

impl SetupService {
    pub fn new(access: StoreAccess) -> Self {
        Self {
            access,
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    /// Seed the signed-in user's defaults unless they already exist
    pub async fn setup_user(&self) -> Result<SetupResult> {
        self.errors.clear();
        let result = self.setup_inner().await;
        self.errors.track("set up user", result)
    }

    async fn setup_inner(&self) -> Result<SetupResult> {
        let user_id = self.access.user_id().await?;
        let store = self.access.store();

        if store.get_one(USERS_COLLECTION, &user_id).await?.is_some() {
            tracing::info!(user_id = %user_id, "user already set up, skipping seed");
            return Ok(SetupResult {
                user_id,
                seeded: false,
                categories: 0,
                accounts: 0,
            });
        }

        tracing::info!(user_id = %user_id, "seeding new user");
        store
            .set(USERS_COLLECTION, &user_id, encode(&UserProfile::new(user_id.as_str()))?)
            .await?;

        let categories = default_categories();
        let categories_path = Collection::Categories.path(&user_id);
        for category in &categories {
            store
                .set(&categories_path, &category.id, encode(category)?)
                .await?;
        }

        let accounts_path = Collection::Accounts.path(&user_id);
        for (order, name) in DEFAULT_ACCOUNTS.iter().enumerate() {
            let mut new = NewAccount::new(*name, Decimal::ZERO);
            new.color = DEFAULT_ACCOUNT_COLORS[order % DEFAULT_ACCOUNT_COLORS.len()].to_string();
            new.order = Some(order as i64);
            new.include_in_total = Some(true);
            let account = new.into_account(*name);
            store.set(&accounts_path, name, encode(&account)?).await?;
        }

        tracing::info!(
            user_id = %user_id,
            categories = categories.len(),
            accounts = DEFAULT_ACCOUNTS.len(),
            "user seeded"
        );
        Ok(SetupResult {
            user_id,
            seeded: true,
            categories: categories.len(),
            accounts: DEFAULT_ACCOUNTS.len(),
        })
    }
}
