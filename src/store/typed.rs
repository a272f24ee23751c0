//! Typed access to the document store for aggregates persisted as JSON.

use super::ports::{
    Collection, Document, DocumentId, DocumentStore, StoreError, StoreResult, UpdateOutcome,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// An aggregate persisted as one document in a fixed collection.
pub trait StoredDocument: Serialize + DeserializeOwned {
    /// Collection holding documents of this type.
    const COLLECTION: Collection;

    /// Returns the identifier under which this aggregate is stored.
    fn document_id(&self) -> DocumentId;
}

/// Serialises an aggregate into a document.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when serialisation fails or
/// [`StoreError::InvalidDocument`] when the aggregate is not a JSON object.
pub fn to_document<T: StoredDocument>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value).map_err(StoreError::serialization)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::InvalidDocument {
            collection: T::COLLECTION,
            reason: "aggregate did not serialise to an object".to_owned(),
        }),
    }
}

/// Deserialises an aggregate from a document.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when the document does not match
/// the aggregate shape.
pub fn from_document<T: StoredDocument>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document)).map_err(StoreError::serialization)
}

/// Builds a patch holding only the named fields of the aggregate.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDocument`] when a named field is not part of
/// the serialised aggregate.
pub fn field_patch<T: StoredDocument>(value: &T, fields: &[&str]) -> StoreResult<Document> {
    let mut document = to_document(value)?;
    let mut patch = Document::new();
    for field in fields {
        let Some(field_value) = document.remove(*field) else {
            return Err(StoreError::InvalidDocument {
                collection: T::COLLECTION,
                reason: format!("unknown field '{field}'"),
            });
        };
        patch.insert((*field).to_owned(), field_value);
    }
    Ok(patch)
}

/// Loads an aggregate by identifier.
///
/// # Errors
///
/// Propagates store and deserialisation failures.
pub async fn fetch<T, S>(store: &S, id: &DocumentId) -> StoreResult<Option<T>>
where
    T: StoredDocument,
    S: DocumentStore + ?Sized,
{
    store
        .find_by_id(T::COLLECTION, id)
        .await?
        .map(from_document)
        .transpose()
}

/// Loads every aggregate of a collection.
///
/// # Errors
///
/// Propagates store and deserialisation failures.
pub async fn fetch_all<T, S>(store: &S) -> StoreResult<Vec<T>>
where
    T: StoredDocument,
    S: DocumentStore + ?Sized,
{
    store
        .list(T::COLLECTION)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

/// Inserts a new aggregate.
///
/// # Errors
///
/// Returns [`StoreError::DuplicateDocument`] when the identifier is taken,
/// plus any store or serialisation failure.
pub async fn insert_new<T, S>(store: &S, value: &T) -> StoreResult<()>
where
    T: StoredDocument,
    S: DocumentStore + ?Sized,
{
    let document = to_document(value)?;
    let stored_id = store.insert(T::COLLECTION, document).await?;
    let expected = value.document_id();
    if stored_id != expected {
        return Err(StoreError::InvalidDocument {
            collection: T::COLLECTION,
            reason: format!("store assigned id {stored_id}, expected {expected}"),
        });
    }
    Ok(())
}

/// Overwrites every field of a stored aggregate with its current state.
///
/// # Errors
///
/// Propagates store and serialisation failures.
pub async fn replace<T, S>(store: &S, value: &T) -> StoreResult<UpdateOutcome>
where
    T: StoredDocument,
    S: DocumentStore + ?Sized,
{
    let patch = to_document(value)?;
    store
        .update_by_id(T::COLLECTION, &value.document_id(), patch)
        .await
}

/// Writes the named fields of an aggregate.
///
/// # Errors
///
/// Propagates store and serialisation failures.
pub async fn patch_fields<T, S>(store: &S, value: &T, fields: &[&str]) -> StoreResult<UpdateOutcome>
where
    T: StoredDocument,
    S: DocumentStore + ?Sized,
{
    let patch = field_patch(value, fields)?;
    store
        .update_by_id(T::COLLECTION, &value.document_id(), patch)
        .await
}
