//! Category service

use tokio::sync::RwLock;

use crate::domain::result::{Error, Result};
use crate::domain::{Category, CategoryPatch, EntryType};
use crate::ports::{encode, Collection, OrderBy};

use super::store::{validated, ErrorSlot, StoreAccess};

pub struct CategoryService {
    access: StoreAccess,
    categories: RwLock<Vec<Category>>,
    errors: ErrorSlot,
}

impl CategoryService {
    pub fn new(access: StoreAccess) -> Self {
        Self {
            access,
            categories: RwLock::new(Vec::new()),
            errors: ErrorSlot::default(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.get()
    }

    /// Fetch every category sorted by name
    pub async fn load(&self) -> Result<Vec<Category>> {
        self.errors.clear();
        let result: Result<Vec<Category>> = async {
            let path = self.access.path(Collection::Categories).await?;
            let docs = self
                .access
                .store()
                .list_all(&path, Some(&OrderBy::asc("name")))
                .await?;
            let categories = docs
                .into_iter()
                .map(|d| d.decode::<Category>())
                .collect::<Result<Vec<_>>>()?;
            *self.categories.write().await = categories.clone();
            Ok(categories)
        }
        .await;
        self.errors.track("load categories", result)
    }

    pub async fn list(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }

    /// Categories of one kind, for pickers
    pub async fn list_by_type(&self, entry_type: EntryType) -> Vec<Category> {
        self.categories
            .read()
            .await
            .iter()
            .filter(|c| c.entry_type == entry_type)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Category> {
        self.categories.read().await.iter().find(|c| c.id == id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.categories.read().await.iter().any(|c| c.id == id)
    }

    pub async fn create(&self, category: Category) -> Result<Category> {
        self.errors.clear();
        let result: Result<Category> = async {
            let mut category = category;
            validated(category.validate())?;

            let path = self.access.path(Collection::Categories).await?;
            category.id = self.access.store().create(&path, encode(&category)?).await?;
            tracing::info!(category_id = %category.id, name = %category.name, "category created");

            let mut categories = self.categories.write().await;
            categories.push(category.clone());
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(category)
        }
        .await;
        self.errors.track("create category", result)
    }

    /// Rename or re-icon a category; its type never changes
    pub async fn update(&self, id: &str, patch: CategoryPatch) -> Result<Category> {
        self.errors.clear();
        let result: Result<Category> = async {
            let mut category = self
                .get(id)
                .await
                .ok_or_else(|| Error::not_found(format!("category {}", id)))?;
            category.apply_patch(&patch);
            validated(category.validate())?;

            let path = self.access.path(Collection::Categories).await?;
            self.access
                .store()
                .update(&path, id, encode(&category)?)
                .await?;
            tracing::info!(category_id = %id, "category updated");

            let mut categories = self.categories.write().await;
            if let Some(slot) = categories.iter_mut().find(|c| c.id == id) {
                *slot = category.clone();
            }
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(category)
        }
        .await;
        self.errors.track("update category", result)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.errors.clear();
        let result: Result<()> = async {
            if !self.contains(id).await {
                return Err(Error::not_found(format!("category {}", id)));
            }
            if self
                .access
                .is_referenced(Collection::Transactions, "categoryId", id)
                .await?
            {
                return Err(Error::in_use(format!(
                    "category {} is used by transactions",
                    id
                )));
            }

            let path = self.access.path(Collection::Categories).await?;
            self.access.store().delete(&path, id).await?;
            tracing::info!(category_id = %id, "category deleted");

            self.categories.write().await.retain(|c| c.id != id);
            Ok(())
        }
        .await;
        self.errors.track("delete category", result)
    }
}
