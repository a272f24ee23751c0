//! Diesel schema for document persistence.

diesel::table! {
    /// JSON documents keyed by collection and identifier.
    documents (collection, id) {
        /// Owning collection name.
        #[max_length = 64]
        collection -> Varchar,
        /// Document identifier, unique within the collection.
        #[max_length = 255]
        id -> Varchar,
        /// Document body.
        body -> Jsonb,
        /// Insertion timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

/// Idempotent DDL creating the documents table.
pub const CREATE_DOCUMENTS_TABLE: &str = concat!(
    "CREATE TABLE IF NOT EXISTS documents (",
    "collection VARCHAR(64) NOT NULL, ",
    "id VARCHAR(255) NOT NULL, ",
    "body JSONB NOT NULL, ",
    "created_at TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "PRIMARY KEY (collection, id))",
);
