//! Plumbing shared by every store: session-scoped storage access and the
//! last-error slot

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::domain::result::{Error, Result};
use crate::ports::{Collection, DocumentStore, Fields};
use crate::session::SessionHandle;

/// Default wait for the identity provider to settle
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Document store plus the session that scopes it to one user
#[derive(Clone)]
pub struct StoreAccess {
    store: Arc<dyn DocumentStore>,
    session: SessionHandle,
    timeout: Duration,
}

impl StoreAccess {
    pub fn new(store: Arc<dyn DocumentStore>, session: SessionHandle, timeout: Duration) -> Self {
        Self {
            store,
            session,
            timeout,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Signed-in user id; waits for the session up to the configured timeout
    pub async fn user_id(&self) -> Result<String> {
        self.session.wait_ready(self.timeout).await
    }

    /// `users/{uid}/{collection}` for the signed-in user
    pub async fn path(&self, collection: Collection) -> Result<String> {
        Ok(collection.path(&self.user_id().await?))
    }

    /// Whether any document in `collection` has `field == id`
    pub async fn is_referenced(&self, collection: Collection, field: &str, id: &str) -> Result<bool> {
        let path = self.path(collection).await?;
        let hits = self
            .store
            .find_where(&path, field, &Value::String(id.to_string()))
            .await?;
        Ok(!hits.is_empty())
    }
}

/// Build a one-field partial update
pub(crate) fn single_field(key: &str, value: Value) -> Fields {
    let mut fields = Fields::new();
    fields.insert(key.to_string(), value);
    fields
}

/// Message of the most recent failed operation on a store
///
/// Each public operation clears it on entry and records its failure on exit.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    last: Mutex<Option<String>>,
}

impl ErrorSlot {
    pub fn clear(&self) {
        if let Ok(mut last) = self.last.lock() {
            *last = None;
        }
    }

    pub fn get(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }

    /// Record and log a failure, passing the result through untouched
    pub fn track<T>(&self, operation: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::error!(operation, error = %e, "operation failed");
            if let Ok(mut last) = self.last.lock() {
                *last = Some(e.to_string());
            }
        }
        result
    }
}

/// Domain validators report `&'static str`; lift them into `Error::Validation`
pub(crate) fn validated(check: std::result::Result<(), &'static str>) -> Result<()> {
    check.map_err(Error::validation)
}
