//! Document persistence for Worktally.
//!
//! Projects and tasks are stored as JSON documents in named collections with
//! no database-level referential integrity between them. The module follows
//! hexagonal architecture:
//!
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Typed aggregate helpers in [`typed`]

pub mod adapters;
pub mod ports;
pub mod typed;
