//! Domain model for task lifecycle and time accounting.
//!
//! Tasks move through a fixed state machine; every transition appends to the
//! task's event log, and tracked time is derived from that log by
//! [`TimeLedger`].

mod error;
mod ids;
mod ledger;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskTitle};
pub use ledger::{TimeLedger, TimeSummary};
pub use status::{TaskOperation, TaskStatus};
pub use task::{PauseInterval, PersistedTaskData, Task};
