//! `PostgreSQL` repository implementation for document storage.

use super::{
    models::{DocumentRow, NewDocumentRow},
    schema::{CREATE_DOCUMENTS_TABLE, documents},
};
use crate::store::ports::{
    Collection, DeleteOutcome, Document, DocumentId, DocumentStore, StoreError, StoreResult,
    UpdateOutcome,
    document::{merge_patch, resolve_document_id, validate_patch},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;
use tracing::info;

/// `PostgreSQL` connection pool type used by the document adapter.
pub type DocumentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed document store.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: DocumentPgPool,
}

impl PostgresDocumentStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DocumentPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool and creates the documents table if missing.
    ///
    /// Blocks while the pool establishes its connections, so call it once at
    /// process start.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the database is unreachable or
    /// the schema cannot be created.
    pub fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .map_err(StoreError::persistence)?;
        let mut connection = pool.get().map_err(StoreError::persistence)?;
        connection
            .batch_execute(CREATE_DOCUMENTS_TABLE)
            .map_err(StoreError::persistence)?;
        info!(max_connections, "connected PostgreSQL document store");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>> {
        let lookup_id = id.clone();
        self.run_blocking(move |connection| {
            let row = documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(lookup_id.as_str()))
                .select(DocumentRow::as_select())
                .first::<DocumentRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            row.map(|found| row_to_document(collection, found))
                .transpose()
        })
        .await
    }

    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> StoreResult<DocumentId> {
        let id = resolve_document_id(collection, &mut document)?;
        let timestamp = Utc::now();
        let new_row = NewDocumentRow {
            collection: collection.as_str().to_owned(),
            id: id.as_str().to_owned(),
            body: Value::Object(document),
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(documents::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StoreError::DuplicateDocument {
                            collection,
                            id: id.clone(),
                        }
                    }
                    _ => StoreError::persistence(err),
                })?;
            Ok(id)
        })
        .await
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
        patch: Document,
    ) -> StoreResult<UpdateOutcome> {
        validate_patch(collection, id, &patch)?;
        let target_id = id.clone();
        self.run_blocking(move |connection| {
            // Row stays locked from read to write.
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let row = documents::table
                        .filter(documents::collection.eq(collection.as_str()))
                        .filter(documents::id.eq(target_id.as_str()))
                        .select(DocumentRow::as_select())
                        .for_update()
                        .first::<DocumentRow>(tx)
                        .optional()?;
                    let Some(found) = row else {
                        return Ok(UpdateOutcome::UNMATCHED);
                    };
                    let Value::Object(mut body) = found.body else {
                        return Ok(UpdateOutcome::matched(false));
                    };
                    if !merge_patch(&mut body, patch) {
                        return Ok(UpdateOutcome::matched(false));
                    }
                    diesel::update(
                        documents::table
                            .filter(documents::collection.eq(collection.as_str()))
                            .filter(documents::id.eq(target_id.as_str())),
                    )
                    .set((
                        documents::body.eq(Value::Object(body)),
                        documents::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)?;
                    Ok(UpdateOutcome::matched(true))
                })
                .map_err(StoreError::persistence)
        })
        .await
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> StoreResult<DeleteOutcome> {
        let target_id = id.clone();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                documents::table
                    .filter(documents::collection.eq(collection.as_str()))
                    .filter(documents::id.eq(target_id.as_str())),
            )
            .execute(connection)
            .map_err(StoreError::persistence)?;
            let deleted_count = u64::try_from(deleted).map_err(StoreError::persistence)?;
            Ok(DeleteOutcome { deleted_count })
        })
        .await
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.run_blocking(move |connection| {
            let rows = documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .order((documents::created_at.asc(), documents::id.asc()))
                .select(DocumentRow::as_select())
                .load::<DocumentRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_document(collection, row))
                .collect()
        })
        .await
    }
}

fn row_to_document(collection: Collection, row: DocumentRow) -> StoreResult<Document> {
    match row.body {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::InvalidDocument {
            collection,
            reason: format!("stored body of {} is not an object", row.id),
        }),
    }
}
