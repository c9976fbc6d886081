//! Per-request operation context.

use littlesteps_auth::Caller;
use littlesteps_core::store::CareStore;

/// Everything an operation needs: the authenticated caller and a handle to
/// the store acquired for this request scope.
///
/// The context is built once per request and dropped with it; no entity
/// state survives between operations.
pub struct RequestContext<S> {
  pub caller: Caller,
  pub store:  S,
}

impl<S: CareStore> RequestContext<S> {
  pub fn new(caller: Caller, store: S) -> Self {
    Self { caller, store }
  }
}
