//! DuckDB document store
//!
//! Persists every collection in a single `sys_documents` table. Payloads are
//! stored as JSON text; filtering and ordering happen after the rows are read.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use duckdb::{params, Connection, OptionalExt};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{sort_documents, Document, DocumentStore, Fields, OrderBy};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

fn parse_fields(raw: &str) -> Result<Fields> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::remote(format!(
            "stored document is not an object: {}",
            other
        ))),
    }
}

pub struct DuckDbDocumentStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbDocumentStore {
    /// Open (or create) a database file and apply pending migrations
    ///
    /// Retries with exponential backoff while another process holds the file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut attempt = 0;
        let conn = loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => break conn,
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            delay_ms = delay.as_millis() as u64,
                            attempt = attempt + 1,
                            max = MAX_RETRIES,
                            error = %err_msg,
                            "database busy, retrying"
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        };

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path.to_path_buf()),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// A throwaway database living only as long as the store
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Cached extensions can fail code-signing checks on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Ensure the documents table exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        let result = MigrationService::new(&conn).run_pending()?;
        if !result.applied.is_empty() {
            tracing::debug!(applied = ?result.applied, "schema migrated");
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::remote(format!("database lock poisoned: {}", e)))
    }

    fn read_collection(&self, path: &str) -> Result<Vec<Document>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT document_id, CAST(data AS VARCHAR) FROM sys_documents
             WHERE collection_path = ? ORDER BY created_at, document_id",
        )?;
        let rows = stmt.query_map([path], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            docs.push(Document::new(id, parse_fields(&raw)?));
        }
        Ok(docs)
    }

    fn read_one(conn: &Connection, path: &str, id: &str) -> Result<Option<Fields>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT CAST(data AS VARCHAR) FROM sys_documents
                 WHERE collection_path = ? AND document_id = ?",
                params![path, id],
                |row| row.get(0),
            )
            .optional()?;
        raw.as_deref().map(parse_fields).transpose()
    }

    fn upsert(conn: &Connection, path: &str, id: &str, data: &Fields) -> Result<()> {
        let json = serde_json::to_string(data)?;
        conn.execute(
            "INSERT INTO sys_documents (collection_path, document_id, data)
             VALUES (?, ?, ?::JSON)
             ON CONFLICT (collection_path, document_id)
             DO UPDATE SET data = excluded.data, updated_at = current_timestamp",
            params![path, id, json],
        )?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for DuckDbDocumentStore {
    async fn list_all(&self, path: &str, order_by: Option<&OrderBy>) -> Result<Vec<Document>> {
        let mut docs = self.read_collection(path)?;
        if let Some(order_by) = order_by {
            sort_documents(&mut docs, order_by);
        }
        Ok(docs)
    }

    async fn get_one(&self, path: &str, id: &str) -> Result<Option<Document>> {
        let conn = self.conn()?;
        Ok(Self::read_one(&conn, path, id)?.map(|data| Document::new(id, data)))
    }

    async fn create(&self, path: &str, data: Fields) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let conn = self.conn()?;
        Self::upsert(&conn, path, &id, &data)?;
        Ok(id)
    }

    async fn set(&self, path: &str, id: &str, data: Fields) -> Result<()> {
        let conn = self.conn()?;
        Self::upsert(&conn, path, id, &data)
    }

    async fn update(&self, path: &str, id: &str, partial: Fields) -> Result<()> {
        let conn = self.conn()?;
        let mut existing = Self::read_one(&conn, path, id)?
            .ok_or_else(|| Error::remote(format!("no document to update: {}/{}", path, id)))?;
        for (key, value) in partial {
            existing.insert(key, value);
        }
        Self::upsert(&conn, path, id, &existing)
    }

    async fn delete(&self, path: &str, id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sys_documents WHERE collection_path = ? AND document_id = ?",
            params![path, id],
        )?;
        Ok(())
    }

    async fn find_where(&self, path: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        Ok(self
            .read_collection(path)?
            .into_iter()
            .filter(|doc| doc.data.get(field) == Some(value))
            .collect())
    }
}
