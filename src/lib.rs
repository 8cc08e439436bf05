//! Household organizer core: per-person recurring task schedules with
//! same-day completion, chore rotation, a weekly media time quota, and the
//! shared shopping and household lists, all kept as JSON blobs in a
//! key-value [`storage::Store`].

pub mod board;
pub mod chores;
pub mod commands;
pub mod config;
pub mod error;
pub mod lists;
pub mod logging;
pub mod models;
pub mod schedule;
pub mod storage;
pub mod summary;

pub use board::{MemberBoard, QuotaOutcome};
pub use chores::{next_chore, Chore};
pub use config::HouseholdConfig;
pub use error::{BoardError, Result};
pub use storage::{FileStore, MemoryStore, Store};
