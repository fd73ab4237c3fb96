//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the sync core and an external
//! system (GitHub, Todoist, ID generation). Implementations live in
//! `src/adapters/`.

pub mod id_gen;
pub mod issues;
pub mod tasks;

pub use id_gen::IdGenerator;
pub use issues::{IssueRecord, IssueSource};
pub use tasks::{
    CommitReceipt, Label, Note, Project, StateSnapshot, SyncCommand, TaskBackend, TaskItem,
};
