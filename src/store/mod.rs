//! Document store
//!
//! The back-office keeps its records in a schema-less document database:
//! one named collection per record type, each document a flat field set
//! under an opaque key assigned by the store.
//!
//! # Architecture
//!
//! - `DocumentStore` - the operations the application relies on
//! - `Query` - ordered reads, with a natural collation for business ids
//! - `memory.rs` - in-process implementation with JSON snapshots
//! - `records.rs` - typed access to a collection of one [`Record`] type
//! - `error.rs` - store errors
//!
//! [`Record`]: crate::model::Record

mod error;
mod memory;
mod records;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{Records, records};

use crate::model::DocumentKey;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;
use std::sync::Arc;

/// Flat field set of one document
pub type Document = Map<String, JsonValue>;

/// A document together with its key
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: DocumentKey,
    pub fields: Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// How string values are compared when ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collation {
    /// Plain byte order: `"LS99999" > "LS100000"`
    #[default]
    Lexical,
    /// Shorter strings first, then byte order: `"LS99999" < "LS100000"`.
    /// Orders prefixed counters by their number once they outgrow their padding.
    Natural,
}

/// Ordered read of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub order_by: String,
    pub direction: Direction,
    pub collation: Collation,
    pub limit: Option<usize>,
}

impl Query {
    pub fn order_by(field: &str) -> Self {
        Self {
            order_by: field.to_string(),
            direction: Direction::Ascending,
            collation: Collation::Lexical,
            limit: None,
        }
    }

    pub fn natural(mut self) -> Self {
        self.collation = Collation::Natural;
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = Direction::Descending;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Operations the application performs against the document database.
///
/// Collections are created implicitly by the first insert. There are no
/// transactions: a read followed by a write can interleave with other
/// clients.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new document and returns the key assigned to it
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentKey>;

    /// Merges `document` into the existing document under `key`
    async fn update(&self, collection: &str, key: &DocumentKey, document: Document)
    -> StoreResult<()>;

    /// Removes the document immediately. There is no tombstone.
    async fn delete(&self, collection: &str, key: &DocumentKey) -> StoreResult<()>;

    async fn get(&self, collection: &str, key: &DocumentKey) -> StoreResult<Option<Document>>;

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>>;

    /// Documents whose `field` equals `value`
    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Vec<StoredDocument>>;
}

/// One store shared by several desks
#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentKey> {
        (**self).insert(collection, document).await
    }

    async fn update(
        &self,
        collection: &str,
        key: &DocumentKey,
        document: Document,
    ) -> StoreResult<()> {
        (**self).update(collection, key, document).await
    }

    async fn delete(&self, collection: &str, key: &DocumentKey) -> StoreResult<()> {
        (**self).delete(collection, key).await
    }

    async fn get(&self, collection: &str, key: &DocumentKey) -> StoreResult<Option<Document>> {
        (**self).get(collection, key).await
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        (**self).query(collection, query).await
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Vec<StoredDocument>> {
        (**self).find_by(collection, field, value).await
    }
}

/// Total order used for `order_by`: missing fields first, then nulls,
/// booleans, numbers, strings (per `collation`); anything else by its JSON text.
pub(crate) fn compare_fields(
    a: Option<&JsonValue>,
    b: Option<&JsonValue>,
    collation: Collation,
) -> Ordering {
    fn rank(v: Option<&JsonValue>) -> u8 {
        match v {
            None => 0,
            Some(JsonValue::Null) => 1,
            Some(JsonValue::Bool(_)) => 2,
            Some(JsonValue::Number(_)) => 3,
            Some(JsonValue::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => match collation {
            Collation::Lexical => x.cmp(y),
            Collation::Natural => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        },
        _ => match rank(a).cmp(&rank(b)) {
            Ordering::Equal => a.map(|v| v.to_string()).cmp(&b.map(|v| v.to_string())),
            other => other,
        },
    }
}
