//! In-memory document store for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::store::ports::{
    Collection, DeleteOutcome, Document, DocumentId, DocumentStore, StoreError, StoreResult,
    UpdateOutcome,
    document::{merge_patch, resolve_document_id, validate_patch},
};

/// Thread-safe in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    collections: HashMap<Collection, CollectionState>,
}

#[derive(Debug, Default)]
struct CollectionState {
    documents: HashMap<DocumentId, Document>,
    insertion_order: Vec<DocumentId>,
}

impl InMemoryDocumentStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .collections
            .get(&collection)
            .and_then(|entries| entries.documents.get(id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> StoreResult<DocumentId> {
        let id = resolve_document_id(collection, &mut document)?;
        let mut state = self.state.write().map_err(lock_error)?;
        let entries = state.collections.entry(collection).or_default();
        if entries.documents.contains_key(&id) {
            return Err(StoreError::DuplicateDocument { collection, id });
        }
        entries.insertion_order.push(id.clone());
        entries.documents.insert(id.clone(), document);
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
        patch: Document,
    ) -> StoreResult<UpdateOutcome> {
        validate_patch(collection, id, &patch)?;
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(document) = state
            .collections
            .get_mut(&collection)
            .and_then(|entries| entries.documents.get_mut(id))
        else {
            return Ok(UpdateOutcome::UNMATCHED);
        };
        Ok(UpdateOutcome::matched(merge_patch(document, patch)))
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<DeleteOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(entries) = state.collections.get_mut(&collection) else {
            return Ok(DeleteOutcome::default());
        };
        if entries.documents.remove(id).is_none() {
            return Ok(DeleteOutcome::default());
        }
        entries.insertion_order.retain(|existing| existing != id);
        Ok(DeleteOutcome { deleted_count: 1 })
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let state = self.state.read().map_err(lock_error)?;
        let Some(entries) = state.collections.get(&collection) else {
            return Ok(Vec::new());
        };
        Ok(entries
            .insertion_order
            .iter()
            .filter_map(|id| entries.documents.get(id).cloned())
            .collect())
    }
}
