//! Goal Planner Connect - HTTP client for the remote goal record store.
//!
//! [`GoalApiClient`] implements `GoalStoreTrait` against the REST `/goals`
//! resource served by `goal-planner-server` (or any compatible server), so a
//! `GoalService` can run against a remote store.

pub mod client;

pub use client::{GoalApiClient, DEFAULT_API_URL};
