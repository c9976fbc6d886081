//! Route handlers: thin adapters between axum extractors and the record
//! operations.

pub mod activities;
pub mod children;
pub mod health;
