//! Diesel row models for document persistence.

use super::schema::documents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for stored documents.
///
/// Collection and timestamps only filter and order queries, so they are not
/// selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    /// Document identifier.
    pub id: String,
    /// Document body.
    pub body: Value,
}

/// Insert model for stored documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow {
    /// Owning collection name.
    pub collection: String,
    /// Document identifier.
    pub id: String,
    /// Document body.
    pub body: Value,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
