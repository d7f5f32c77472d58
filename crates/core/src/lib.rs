//! Goal Planner Core - Domain entities, services, and traits.
//!
//! This crate contains the savings goal business logic: the goal model, the
//! status engine, aggregation and the session's goal collection. It is
//! store-agnostic and defines the `GoalStoreTrait` implemented by the
//! `storage-sqlite` and `connect` crates.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
