//! SQLite storage implementation for the Goal Planner.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the `GoalStoreTrait` defined in `goal-planner-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A single-writer actor that runs every write in an immediate transaction
//! - The goal repository with version-checked updates
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod goals;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from goal-planner-core for convenience
pub use goal_planner_core::errors::{DatabaseError, Error, Result};
