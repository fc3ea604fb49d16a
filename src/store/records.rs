use super::{Document, DocumentStore, Query, StoreError, StoreResult, StoredDocument};
use crate::model::{DocumentKey, Record, Stored};
use serde_json::Value as JsonValue;
use std::marker::PhantomData;

/// Typed view of the collection holding records of type `R`
pub struct Records<'a, R, S: ?Sized> {
    store: &'a S,
    _record: PhantomData<fn() -> R>,
}

/// Typed access to the collection of `R` in `store`
pub fn records<R: Record, S: DocumentStore + ?Sized>(store: &S) -> Records<'_, R, S> {
    Records {
        store,
        _record: PhantomData,
    }
}

impl<'a, R: Record, S: DocumentStore + ?Sized> Records<'a, R, S> {
    pub async fn insert(&self, record: &R) -> StoreResult<DocumentKey> {
        self.store.insert(R::COLLECTION, encode(record)?).await
    }

    pub async fn update(&self, key: &DocumentKey, record: &R) -> StoreResult<()> {
        self.store.update(R::COLLECTION, key, encode(record)?).await
    }

    pub async fn delete(&self, key: &DocumentKey) -> StoreResult<()> {
        self.store.delete(R::COLLECTION, key).await
    }

    pub async fn get(&self, key: &DocumentKey) -> StoreResult<Option<Stored<R>>> {
        match self.store.get(R::COLLECTION, key).await? {
            Some(fields) => Ok(Some(Stored::new(key.clone(), decode(fields)?))),
            None => Ok(None),
        }
    }

    /// Like [`Records::get`], failing when the document is gone
    pub async fn fetch(&self, key: &DocumentKey) -> StoreResult<Stored<R>> {
        self.get(key).await?.ok_or_else(|| StoreError::DocumentNotFound {
            collection: R::COLLECTION.to_string(),
            key: key.to_string(),
        })
    }

    /// Every record, ordered by business id
    pub async fn list(&self) -> StoreResult<Vec<Stored<R>>> {
        let query = Query::order_by(R::ID_FIELD).natural();
        let docs = self.store.query(R::COLLECTION, &query).await?;
        decode_all(docs)
    }

    /// Business id of the record with the highest id, `None` for an empty collection.
    ///
    /// Ids are compared naturally, so `LS100000` follows `LS99999`.
    pub async fn last_business_id(&self) -> StoreResult<Option<String>> {
        let query = Query::order_by(R::ID_FIELD).natural().descending().limit(1);
        let docs = self.store.query(R::COLLECTION, &query).await?;

        match docs.into_iter().next() {
            Some(doc) => match doc.fields.get(R::ID_FIELD) {
                Some(JsonValue::String(id)) => Ok(Some(id.clone())),
                other => Err(StoreError::InvalidDocument(format!(
                    "'{}' of document '{}' in '{}' is not a string: {:?}",
                    R::ID_FIELD,
                    doc.key,
                    R::COLLECTION,
                    other
                ))),
            },
            None => Ok(None),
        }
    }

    /// Records whose `field` equals `value`
    pub async fn find_by(&self, field: &str, value: &str) -> StoreResult<Vec<Stored<R>>> {
        let docs = self
            .store
            .find_by(R::COLLECTION, field, &JsonValue::String(value.to_string()))
            .await?;
        decode_all(docs)
    }

    /// The record with business id `id`
    pub async fn find_by_business_id(&self, id: &str) -> StoreResult<Option<Stored<R>>> {
        Ok(self.find_by(R::ID_FIELD, id).await?.into_iter().next())
    }
}

pub(crate) fn encode<R: Record>(record: &R) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        JsonValue::Object(fields) => Ok(fields),
        other => Err(StoreError::InvalidDocument(format!(
            "{} did not encode to an object: {}",
            R::COLLECTION,
            other
        ))),
    }
}

pub(crate) fn decode<R: Record>(fields: Document) -> StoreResult<R> {
    Ok(serde_json::from_value(JsonValue::Object(fields))?)
}

fn decode_all<R: Record>(docs: Vec<StoredDocument>) -> StoreResult<Vec<Stored<R>>> {
    docs.into_iter()
        .map(|doc| Ok(Stored::new(doc.key, decode(doc.fields)?)))
        .collect()
}
