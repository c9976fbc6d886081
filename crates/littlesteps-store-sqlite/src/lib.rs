//! SQLite backend for the littlesteps care store.
//!
//! Documents are stored as rows with JSON-encoded sets and detail payloads,
//! matching the insert/find/update/delete-one semantics the core expects
//! from its backing store. Wraps [`tokio_rusqlite`] so all database access
//! runs off the async runtime's worker threads.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
