//! Runtime selection between the available document store adapters.

use async_trait::async_trait;

use super::{memory::InMemoryDocumentStore, postgres::PostgresDocumentStore};
use crate::config::StoreConfig;
use crate::store::ports::{
    Collection, DeleteOutcome, Document, DocumentId, DocumentStore, StoreResult, UpdateOutcome,
};

/// Document store chosen by configuration at process start.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    /// Process-local in-memory store.
    Memory(InMemoryDocumentStore),
    /// `PostgreSQL`-backed store.
    Postgres(PostgresDocumentStore),
}

impl ConfiguredStore {
    /// Builds the adapter described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the `PostgreSQL` pool cannot be
    /// established.
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        match config {
            StoreConfig::Memory => Ok(Self::Memory(InMemoryDocumentStore::new())),
            StoreConfig::Postgres {
                url,
                max_connections,
            } => PostgresDocumentStore::connect(url, *max_connections).map(Self::Postgres),
        }
    }

    fn inner(&self) -> &dyn DocumentStore {
        match self {
            Self::Memory(store) => store,
            Self::Postgres(store) => store,
        }
    }
}

#[async_trait]
impl DocumentStore for ConfiguredStore {
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>> {
        self.inner().find_by_id(collection, id).await
    }

    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<DocumentId> {
        self.inner().insert(collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
        patch: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.inner().update_by_id(collection, id, patch).await
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<DeleteOutcome> {
        self.inner().delete_by_id(collection, id).await
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.inner().list(collection).await
    }
}
