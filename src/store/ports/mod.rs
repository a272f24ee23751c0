//! Port contracts for document persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the project and
//! task services.

pub mod document;

pub use document::{
    Collection, DeleteOutcome, Document, DocumentId, DocumentStore, StoreError, StoreResult,
    UpdateOutcome,
};

#[cfg(test)]
pub use document::MockDocumentStore;
