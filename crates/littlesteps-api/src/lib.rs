//! Record operations for littlesteps.
//!
//! Transport-free orchestration between the credential layer and a
//! [`CareStore`] backend: every operation takes an explicit
//! [`RequestContext`] and returns `Result<_, littlesteps_core::Error>`, so
//! the HTTP layer can map outcomes to status codes mechanically.
//!
//! [`CareStore`]: littlesteps_core::store::CareStore

pub mod access;
pub mod activities;
pub mod children;
pub mod context;

pub use context::RequestContext;

#[cfg(test)]
mod tests;
