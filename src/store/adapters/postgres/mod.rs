//! `PostgreSQL` adapter for document persistence.

mod models;
mod repository;
mod schema;

pub use repository::{DocumentPgPool, PostgresDocumentStore};
