//! In-memory document store
//!
//! Backs tests and throwaway sessions. Writes to selected collection paths can be
//! made to fail so callers can exercise storage-rejection handling.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{sort_documents, Document, DocumentStore, Fields, OrderBy};

type Collections = HashMap<String, BTreeMap<String, Fields>>;

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<Collections>,
    failing_paths: Mutex<HashSet<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write under `path` fail with a storage error
    pub fn fail_writes(&self, path: impl Into<String>) {
        if let Ok(mut failing) = self.failing_paths.lock() {
            failing.insert(path.into());
        }
    }

    /// Undo `fail_writes` for every path
    pub fn heal(&self) {
        if let Ok(mut failing) = self.failing_paths.lock() {
            failing.clear();
        }
    }

    /// Number of documents currently stored under `path`
    pub fn count(&self, path: &str) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(path).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|e| Error::remote(format!("store lock poisoned: {}", e)))
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        let failing = self
            .failing_paths
            .lock()
            .map_err(|e| Error::remote(format!("store lock poisoned: {}", e)))?;
        if failing.contains(path) {
            return Err(Error::remote(format!("write rejected for {}", path)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, path: &str, order_by: Option<&OrderBy>) -> Result<Vec<Document>> {
        let collections = self.lock()?;
        let mut docs: Vec<Document> = collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order_by) = order_by {
            sort_documents(&mut docs, order_by);
        }
        Ok(docs)
    }

    async fn get_one(&self, path: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(path)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn create(&self, path: &str, data: Fields) -> Result<String> {
        self.check_writable(path)?;
        let id = Uuid::new_v4().simple().to_string();
        self.lock()?
            .entry(path.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, path: &str, id: &str, data: Fields) -> Result<()> {
        self.check_writable(path)?;
        self.lock()?
            .entry(path.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, path: &str, id: &str, partial: Fields) -> Result<()> {
        self.check_writable(path)?;
        let mut collections = self.lock()?;
        let existing = collections
            .get_mut(path)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| Error::remote(format!("no document to update: {}/{}", path, id)))?;
        for (key, value) in partial {
            existing.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, path: &str, id: &str) -> Result<()> {
        self.check_writable(path)?;
        if let Some(docs) = self.lock()?.get_mut(path) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn find_where(&self, path: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| data.get(field) == Some(value))
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
