//! The `CareStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `littlesteps-store-sqlite`). Higher layers depend on this abstraction,
//! not on any concrete backend, and reclassify backend errors into the
//! shared taxonomy before they reach a caller.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  activity::{Activity, NewActivity},
  child::{Child, ChildSummary, NewChild},
  id::RecordId,
  update::ChildUpdate,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Filter parameters for [`CareStore::list_activities`].
///
/// The time range is half-open: `start <= created_at < end`.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
  /// Exact match on the activity type tag.
  pub kind:  Option<String>,
  /// Inclusive lower bound on `created_at`.
  pub start: Option<DateTime<Utc>>,
  /// Exclusive upper bound on `created_at`.
  pub end:   Option<DateTime<Utc>>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the child/activity relationship store.
///
/// Implementations own all durable state; in-process entity values are
/// transient and scoped to one request. All methods return `Send` futures so
/// the trait can be used from multi-threaded async runtimes.
pub trait CareStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Children ──────────────────────────────────────────────────────────

  /// Persist a new child with `parent_ids = [initial_parent]`, empty
  /// supervisor set, and a store-assigned id and creation time.
  fn create_child(
    &self,
    new: NewChild,
    initial_parent: RecordId,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + '_;

  /// Retrieve a child by id. `None` if not found.
  fn get_child(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Child>, Self::Error>> + Send + '_;

  /// Apply a partial merge of the allow-listed fields. Returns whether a
  /// matching record existed; an empty update returns `false` without
  /// contacting the backing store.
  fn update_child(
    &self,
    id: RecordId,
    update: ChildUpdate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Idempotent set-add of a supervisor link. Returns `true` iff the child
  /// exists — membership, not modification count, decides the result.
  fn add_supervisor(
    &self,
    child: RecordId,
    supervisor: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Relationship queries ──────────────────────────────────────────────

  /// Whether `identity` has guardianship of `child`. Nonexistent children
  /// yield `false`, never an error.
  fn is_parent_of(
    &self,
    identity: RecordId,
    child: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether `identity` supervises `child`. Nonexistent children yield
  /// `false`, never an error.
  fn is_supervisor_of(
    &self,
    identity: RecordId,
    child: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Minimal `{_id, name}` projections of the children `identity` parents.
  /// Order follows the store's natural order; callers must not depend on it.
  fn list_children_for_parent(
    &self,
    identity: RecordId,
  ) -> impl Future<Output = Result<Vec<ChildSummary>, Self::Error>> + Send + '_;

  /// As [`Self::list_children_for_parent`], keyed on the supervisor set.
  fn list_children_for_supervisor(
    &self,
    identity: RecordId,
  ) -> impl Future<Output = Result<Vec<ChildSummary>, Self::Error>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  /// Persist a new activity. `created_at` is assigned at insertion when the
  /// input carries none; a caller-supplied value is preserved.
  fn create_activity(
    &self,
    new: NewActivity,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + '_;

  /// Retrieve an activity by id. `None` if not found.
  fn get_activity(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// Activities for one child matching `filter`, sorted by `created_at`
  /// descending. Empty vec (not an error) when nothing matches.
  fn list_activities<'a>(
    &'a self,
    child: RecordId,
    filter: &'a ActivityFilter,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + 'a;

  /// Delete one activity. `true` iff a record existed and was removed;
  /// `false` for not-found, never an error.
  fn delete_activity(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
