use super::{
    Direction, Document, DocumentStore, Query, StoreError, StoreResult, StoredDocument,
    compare_fields,
};
use crate::model::DocumentKey;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

type Collection = BTreeMap<DocumentKey, Document>;
type Snapshot = BTreeMap<String, Collection>;

/// In-process document store
///
/// All collections live behind one lock. Unique constraints are declared
/// per collection and field; documents without the field are not checked.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    unique: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            unique: HashMap::new(),
        }
    }

    /// Rejects inserts and updates that would give two documents of
    /// `collection` the same `field` value
    pub fn with_unique(mut self, collection: &str, field: &str) -> Self {
        let fields = self.unique.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        self
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    /// Writes every collection to `path` as JSON.
    ///
    /// The snapshot is written to a temporary file next to `path` and moved
    /// into place, so a crash never leaves a half-written snapshot behind.
    pub async fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let bytes = {
            let collections = self.collections.read().await;
            let snapshot: Snapshot = collections
                .iter()
                .map(|(name, docs)| (name.clone(), docs.clone()))
                .collect();
            serde_json::to_vec_pretty(&snapshot)?
        };

        let path = path.to_path_buf();
        let written = path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .map_err(|e| StoreError::Io(format!("Snapshot writer failed: {}", e)))??;

        info!(path = %written.display(), "snapshot saved");
        Ok(())
    }

    /// Replaces the contents of the store with the snapshot at `path`
    pub async fn load_snapshot(&self, path: &Path) -> StoreResult<()> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StoreError::Io(format!("Failed to read snapshot '{}': {}", path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

        let mut collections = self.collections.write().await;
        *collections = snapshot.into_iter().collect();

        info!(path = %path.display(), collections = collections.len(), "snapshot loaded");
        Ok(())
    }

    /// Loads the snapshot at `path` into this store when the file exists
    pub async fn load_if_present(self, path: &Path) -> StoreResult<Self> {
        if tokio::fs::try_exists(path).await? {
            self.load_snapshot(path).await?;
        }
        Ok(self)
    }

    fn check_unique(
        &self,
        collection: &str,
        docs: Option<&Collection>,
        key: Option<&DocumentKey>,
        document: &Document,
    ) -> StoreResult<()> {
        let (Some(fields), Some(docs)) = (self.unique.get(collection), docs) else {
            return Ok(());
        };

        for field in fields {
            let Some(value) = document.get(field).filter(|v| !v.is_null()) else {
                continue;
            };

            let clash = docs
                .iter()
                .any(|(k, d)| Some(k) != key && d.get(field) == Some(value));
            if clash {
                return Err(StoreError::UniqueViolation {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| {
        StoreError::Io(format!(
            "Failed to move snapshot into '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentKey> {
        let mut collections = self.collections.write().await;
        self.check_unique(collection, collections.get(collection), None, &document)?;

        let key = DocumentKey::new(Uuid::new_v4().simple().to_string());
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), document);

        debug!(collection, %key, "document inserted");
        Ok(key)
    }

    async fn update(
        &self,
        collection: &str,
        key: &DocumentKey,
        document: Document,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;

        let mut merged = collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        merged.extend(document);

        self.check_unique(collection, collections.get(collection), Some(key), &merged)?;

        if let Some(docs) = collections.get_mut(collection) {
            docs.insert(key.clone(), merged);
        }

        debug!(collection, %key, "document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &DocumentKey) -> StoreResult<()> {
        let mut collections = self.collections.write().await;

        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(key));
        if removed.is_none() {
            return Err(StoreError::DocumentNotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        debug!(collection, %key, "document deleted");
        Ok(())
    }

    async fn get(&self, collection: &str, key: &DocumentKey) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<StoredDocument> = docs
            .iter()
            .map(|(key, fields)| StoredDocument {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect();

        rows.sort_by(|a, b| {
            let ord = compare_fields(
                a.fields.get(&query.order_by),
                b.fields.get(&query.order_by),
                query.collation,
            );
            match query.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .map(|(key, fields)| StoredDocument {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect())
    }
}
