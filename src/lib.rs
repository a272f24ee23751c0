//! Worktally: task time accounting and project/task linkage.
//!
//! This crate holds the business core of a project and task management
//! application. HTTP handlers call into it with typed requests; it reads and
//! writes single documents through an injected document store.
//!
//! # Architecture
//!
//! Worktally follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task state machine and time ledger
//! - [`project`]: Projects and the task linkage they own
//! - [`store`]: Document persistence port and adapters
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod project;
pub mod store;
pub mod task;
pub mod telemetry;
