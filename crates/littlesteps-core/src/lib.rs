//! Core types and trait definitions for the littlesteps record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod activity;
pub mod child;
pub mod error;
pub mod id;
pub mod role;
pub mod store;
pub mod update;

pub use error::{Error, Result};
pub use id::RecordId;
pub use role::Role;

/// Calendar dates (birthdays, listing filters) cross every boundary as
/// `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
