//! # Cadence Store
//!
//! This crate is the Task Tracking Store behind the Cadence API: the
//! relational data model for users, recurring tasks, completions, comments
//! and profile pictures, plus the recurrence semantics that decide whether a
//! task's current cycle is complete.
//!
//! ## Module Organization
//!
//! - `models`: Database rows and their CRUD operations
//! - `store`: The mutation/query contract enforced for authenticated callers
//! - `cycle`: Pure cycle-window and completion-progress engine
//! - `authz`: Caller identity and the owner-or-admin capability check
//! - `db`: Connection pool and migration runner
//! - `error`: The store error taxonomy

pub mod authz;
pub mod cycle;
pub mod db;
pub mod error;
pub mod id;
pub mod models;
pub mod store;

/// Current version of the Cadence store library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
