//! Document store port - hosted database abstraction
//!
//! Records are plain JSON objects grouped in collections addressed by a
//! slash-separated path such as `users/{userId}/transactions`. The document id
//! lives beside the payload, never inside it.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::result::{Error, Result};

/// Document payload
pub type Fields = Map<String, Value>;

/// Top-level collection holding one profile document per user
pub const USERS_COLLECTION: &str = "users";

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Deserialize into a domain type, exposing the id as its `id` field
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let mut data = self.data;
        data.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Serialize a domain type into document fields, dropping its `id`
pub fn encode<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(Error::validation(format!(
            "expected an object document, got {}",
            other
        ))),
    }
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Field ordering for `list_all`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

/// Per-user collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    CreditCards,
    Categories,
    Transactions,
    Transfers,
    Loans,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::CreditCards => "creditCards",
            Self::Categories => "categories",
            Self::Transactions => "transactions",
            Self::Transfers => "transfers",
            Self::Loans => "loans",
        }
    }

    /// `users/{user_id}/{collection}`
    pub fn path(&self, user_id: &str) -> String {
        format!("{}/{}/{}", USERS_COLLECTION, user_id, self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document database abstraction
///
/// Implementations (adapters) map these calls onto a concrete store. Failures
/// coming from the store surface as `Error::Remote`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, optionally ordered by one field
    async fn list_all(&self, path: &str, order_by: Option<&OrderBy>) -> Result<Vec<Document>>;

    async fn get_one(&self, path: &str, id: &str) -> Result<Option<Document>>;

    /// Insert with a generated id and return it
    async fn create(&self, path: &str, data: Fields) -> Result<String>;

    /// Insert or overwrite a document under a caller-chosen id
    async fn set(&self, path: &str, id: &str, data: Fields) -> Result<()>;

    /// Merge fields into an existing document; errors if it does not exist
    async fn update(&self, path: &str, id: &str, partial: Fields) -> Result<()>;

    async fn delete(&self, path: &str, id: &str) -> Result<()>;

    /// Documents whose `field` equals `value`
    async fn find_where(&self, path: &str, field: &str, value: &Value) -> Result<Vec<Document>>;
}

/// Order documents in place the way `list_all` promises
///
/// Missing fields sort first; numbers compare numerically, everything else
/// by its string form.
pub fn sort_documents(docs: &mut [Document], order_by: &OrderBy) {
    docs.sort_by(|a, b| {
        let ord = compare_values(a.data.get(&order_by.field), b.data.get(&order_by.field));
        match order_by.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
