//! Document store port: single-document find, insert, update and delete by id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Field holding the document identifier inside every stored document.
pub const ID_FIELD: &str = "id";

/// A stored JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Named document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Project documents.
    Projects,
    /// Task documents.
    Tasks,
}

impl Collection {
    /// Returns the canonical storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque document identifier, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counts reported by [`DocumentStore::update_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Number of documents matching the identifier (0 or 1).
    pub matched_count: u64,
    /// Number of documents whose content changed (0 or 1).
    pub modified_count: u64,
}

impl UpdateOutcome {
    /// Outcome for an identifier that matched no document.
    pub const UNMATCHED: Self = Self {
        matched_count: 0,
        modified_count: 0,
    };

    /// Outcome for a matched document, modified or not.
    #[must_use]
    pub const fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: if modified { 1 } else { 0 },
        }
    }

    /// Returns `true` when the identifier resolved to a document.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        self.matched_count > 0
    }
}

/// Counts reported by [`DocumentStore::delete_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Number of documents removed (0 or 1).
    pub deleted_count: u64,
}

impl DeleteOutcome {
    /// Returns `true` when a document was removed.
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        self.deleted_count > 0
    }
}

/// Document persistence contract.
///
/// Every operation is one round-trip against the underlying store. No
/// ordering is imposed between concurrent calls touching the same document;
/// the backend's own write semantics decide the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds a document by identifier.
    ///
    /// Returns `None` when the collection holds no such document.
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>>;

    /// Inserts a new document and returns its identifier.
    ///
    /// The identifier is read from the document's `id` field; when absent a
    /// fresh identifier is generated and written into the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateDocument`] when the identifier is
    /// already taken or [`StoreError::InvalidDocument`] when the `id` field
    /// is not a string.
    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<DocumentId>;

    /// Merges the top-level fields of `patch` into an existing document.
    ///
    /// Returns [`UpdateOutcome::UNMATCHED`] when the identifier does not
    /// resolve.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] when the patch attempts to
    /// change the document identifier.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
        patch: Document,
    ) -> StoreResult<UpdateOutcome>;

    /// Deletes a document by identifier.
    async fn delete_by_id(&self, collection: Collection, id: &DocumentId)
    -> StoreResult<DeleteOutcome>;

    /// Returns every document in the collection in insertion order.
    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>>;
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A document with the same identifier already exists.
    #[error("duplicate document {id} in {collection}")]
    DuplicateDocument {
        /// Target collection.
        collection: Collection,
        /// Conflicting identifier.
        id: DocumentId,
    },

    /// The document or patch is structurally unacceptable.
    #[error("invalid document in {collection}: {reason}")]
    InvalidDocument {
        /// Target collection.
        collection: Collection,
        /// Human-readable reason.
        reason: String,
    },

    /// A document could not be converted to or from its typed form.
    #[error("document serialisation error: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a serialisation error.
    #[must_use]
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}

/// Resolves the identifier of a document about to be inserted.
///
/// Writes a generated identifier into the document when it carries none.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDocument`] when the `id` field exists but is
/// not a non-empty string.
pub fn resolve_document_id(
    collection: Collection,
    document: &mut Document,
) -> StoreResult<DocumentId> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(DocumentId::new(id.clone())),
        Some(_) => Err(StoreError::InvalidDocument {
            collection,
            reason: "document id must be a non-empty string".to_owned(),
        }),
        None => {
            let id = DocumentId::generate();
            document.insert(ID_FIELD.to_owned(), Value::String(id.as_str().to_owned()));
            Ok(id)
        }
    }
}

/// Rejects patches that would rewrite the document identifier.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDocument`] when the patch carries an `id`
/// different from `id`.
pub fn validate_patch(collection: Collection, id: &DocumentId, patch: &Document) -> StoreResult<()> {
    match patch.get(ID_FIELD) {
        None => Ok(()),
        Some(Value::String(patched)) if patched == id.as_str() => Ok(()),
        Some(_) => Err(StoreError::InvalidDocument {
            collection,
            reason: format!("patch may not change the id of document {id}"),
        }),
    }
}

/// Merges top-level patch fields into `target`, returning whether anything
/// changed.
pub fn merge_patch(target: &mut Document, patch: Document) -> bool {
    let mut modified = false;
    for (key, value) in patch {
        if target.get(&key) != Some(&value) {
            target.insert(key, value);
            modified = true;
        }
    }
    modified
}
