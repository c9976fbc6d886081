use chrono::{TimeZone, Utc};
use serde_json::json;

use littlesteps_auth::Caller;
use littlesteps_core::{Error, RecordId, Role, store::CareStore};
use littlesteps_store_sqlite::SqliteStore;

use crate::{
  RequestContext,
  activities::{self, CreateActivityRequest, ListActivitiesParams},
  children::{self, CreateChildRequest, LinkSupervisorRequest},
};

fn caller(subject: RecordId, role: Role) -> Caller {
  Caller { subject: subject.to_string(), role }
}

async fn ctx(role: Role) -> (RequestContext<SqliteStore>, RecordId) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let identity = RecordId::generate();
  (RequestContext::new(caller(identity, role), store), identity)
}

fn create_request(name: &str) -> CreateChildRequest {
  CreateChildRequest {
    name:      Some(name.to_owned()),
    birthday:  Some("2021-06-01".to_owned()),
    group:     None,
    allergies: vec![],
    notes:     String::new(),
  }
}

fn activity_request(child: RecordId, kind: &str) -> CreateActivityRequest {
  CreateActivityRequest {
    child_id:   Some(child.to_string()),
    kind:       Some(kind.to_owned()),
    details:    Some(json!({ "note": "ok" })),
    created_at: None,
  }
}

/// A child guarded by `parent` and supervised by `teacher`, in `store`.
async fn seeded_child(
  store: &SqliteStore,
  parent: RecordId,
  teacher: RecordId,
) -> RecordId {
  let parent_ctx =
    RequestContext::new(caller(parent, Role::Parent), store.clone());
  let child = children::create_child(&parent_ctx, create_request("Mika"))
    .await
    .unwrap();
  store.add_supervisor(child, teacher).await.unwrap();
  child
}

// ─── Child creation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn parent_creates_child_as_sole_guardian() {
  let (ctx, parent) = ctx(Role::Parent).await;
  let id = children::create_child(&ctx, create_request("Mika"))
    .await
    .unwrap();

  let child = children::get_child(&ctx, &id.to_string()).await.unwrap();
  assert_eq!(child.parent_ids, [parent]);
  assert!(child.supervisor_ids.is_empty());
}

#[tokio::test]
async fn teacher_cannot_create_child() {
  let (ctx, _) = ctx(Role::Teacher).await;
  let err = children::create_child(&ctx, create_request("Mika"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn child_creation_requires_name_and_birthday() {
  let (ctx, _) = ctx(Role::Parent).await;

  let mut req = create_request("Mika");
  req.name = None;
  assert!(matches!(
    children::create_child(&ctx, req).await,
    Err(Error::Validation(_))
  ));

  let mut req = create_request("Mika");
  req.birthday = Some("June 1st".to_owned());
  assert!(matches!(
    children::create_child(&ctx, req).await,
    Err(Error::Validation(_))
  ));
}

// ─── Child reads ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unrelated_parent_is_denied_without_existence_leak() {
  let (owner_ctx, _) = ctx(Role::Parent).await;
  let child = children::create_child(&owner_ctx, create_request("Mika"))
    .await
    .unwrap();

  let stranger = RequestContext::new(
    caller(RecordId::generate(), Role::Parent),
    owner_ctx.store.clone(),
  );
  let err = children::get_child(&stranger, &child.to_string())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden { .. }));

  // A missing child and a malformed reference produce the same denial.
  let err = children::get_child(&stranger, &RecordId::generate().to_string())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden { .. }));
  let err = children::get_child(&stranger, "not-a-record-id")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn supervising_teacher_can_read_child() {
  let (teacher_ctx, teacher) = ctx(Role::Teacher).await;
  let child =
    seeded_child(&teacher_ctx.store, RecordId::generate(), teacher).await;

  let fetched = children::get_child(&teacher_ctx, &child.to_string())
    .await
    .unwrap();
  assert_eq!(fetched.id, child);
}

#[tokio::test]
async fn listing_follows_role() {
  let (parent_ctx, parent) = ctx(Role::Parent).await;
  let a = children::create_child(&parent_ctx, create_request("Ana"))
    .await
    .unwrap();
  let b = children::create_child(&parent_ctx, create_request("Ben"))
    .await
    .unwrap();

  let teacher = RecordId::generate();
  parent_ctx.store.add_supervisor(b, teacher).await.unwrap();

  let mut listed: Vec<_> = children::list_children(&parent_ctx)
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.id)
    .collect();
  listed.sort_by_key(|id| id.to_string());
  let mut expected = vec![a, b];
  expected.sort_by_key(|id| id.to_string());
  assert_eq!(listed, expected);

  let teacher_ctx = RequestContext::new(
    caller(teacher, Role::Teacher),
    parent_ctx.store.clone(),
  );
  let listed: Vec<_> = children::list_children(&teacher_ctx)
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.id)
    .collect();
  assert_eq!(listed, [b]);

  let other_ctx = RequestContext::new(
    caller(parent, Role::Other("admin".to_owned())),
    parent_ctx.store.clone(),
  );
  assert!(matches!(
    children::list_children(&other_ctx).await,
    Err(Error::Forbidden { .. })
  ));
}

// ─── Child updates ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_ignores_unlisted_keys_and_merges_the_rest() {
  let (ctx, _) = ctx(Role::Parent).await;
  let child = children::create_child(&ctx, create_request("Mika"))
    .await
    .unwrap();

  children::update_child(
    &ctx,
    &child.to_string(),
    &json!({
      "group": "Bumblebees",
      "parent_ids": [],
      "created_at": "2000-01-01T00:00:00Z",
    }),
  )
  .await
  .unwrap();

  let fetched = children::get_child(&ctx, &child.to_string()).await.unwrap();
  assert_eq!(fetched.group.as_deref(), Some("Bumblebees"));
  assert_eq!(fetched.parent_ids.len(), 1);
}

#[tokio::test]
async fn update_with_no_allowed_fields_is_a_validation_failure() {
  let (ctx, _) = ctx(Role::Parent).await;
  let child = children::create_child(&ctx, create_request("Mika"))
    .await
    .unwrap();

  let err =
    children::update_child(&ctx, &child.to_string(), &json!({ "role": "x" }))
      .await
      .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

// ─── Supervisor linking ──────────────────────────────────────────────────────

#[tokio::test]
async fn link_supervisor_is_teacher_only_and_idempotent() {
  let (parent_ctx, _) = ctx(Role::Parent).await;
  let child = children::create_child(&parent_ctx, create_request("Mika"))
    .await
    .unwrap();
  let teacher = RecordId::generate();
  let req = || LinkSupervisorRequest {
    supervisor_id: Some(teacher.to_string()),
  };

  assert!(matches!(
    children::link_supervisor(&parent_ctx, &child.to_string(), req()).await,
    Err(Error::Forbidden { .. })
  ));

  let teacher_ctx = RequestContext::new(
    caller(teacher, Role::Teacher),
    parent_ctx.store.clone(),
  );
  children::link_supervisor(&teacher_ctx, &child.to_string(), req())
    .await
    .unwrap();
  children::link_supervisor(&teacher_ctx, &child.to_string(), req())
    .await
    .unwrap();

  let fetched = children::get_child(&teacher_ctx, &child.to_string())
    .await
    .unwrap();
  assert_eq!(fetched.supervisor_ids, [teacher]);
}

#[tokio::test]
async fn link_supervisor_rejects_malformed_and_unknown_targets() {
  let (ctx, teacher) = ctx(Role::Teacher).await;
  let req = LinkSupervisorRequest { supervisor_id: Some(teacher.to_string()) };

  assert!(matches!(
    children::link_supervisor(&ctx, "zzz", req).await,
    Err(Error::Validation(_))
  ));

  let req = LinkSupervisorRequest { supervisor_id: Some("short".to_owned()) };
  assert!(matches!(
    children::link_supervisor(&ctx, &RecordId::generate().to_string(), req)
      .await,
    Err(Error::Validation(_))
  ));

  let req = LinkSupervisorRequest { supervisor_id: Some(teacher.to_string()) };
  assert!(matches!(
    children::link_supervisor(&ctx, &RecordId::generate().to_string(), req)
      .await,
    Err(Error::NotFound(_))
  ));
}

// ─── Activity creation ───────────────────────────────────────────────────────

#[tokio::test]
async fn supervising_teacher_logs_activity_stamped_with_own_identity() {
  let (teacher_ctx, teacher) = ctx(Role::Teacher).await;
  let child =
    seeded_child(&teacher_ctx.store, RecordId::generate(), teacher).await;

  let id = activities::create_activity(&teacher_ctx, activity_request(child, "meal"))
    .await
    .unwrap();

  let stored = teacher_ctx.store.get_activity(id).await.unwrap().unwrap();
  assert_eq!(stored.logged_by, teacher);
  assert_eq!(stored.child_id, child);
}

#[tokio::test]
async fn non_supervising_teacher_cannot_log_activity() {
  let (teacher_ctx, _) = ctx(Role::Teacher).await;
  let child = seeded_child(
    &teacher_ctx.store,
    RecordId::generate(),
    RecordId::generate(),
  )
  .await;

  let err = activities::create_activity(&teacher_ctx, activity_request(child, "meal"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn activity_creation_validates_shape() {
  let (teacher_ctx, teacher) = ctx(Role::Teacher).await;
  let child =
    seeded_child(&teacher_ctx.store, RecordId::generate(), teacher).await;

  let mut req = activity_request(child, "meal");
  req.details = Some(json!("soup"));
  assert!(matches!(
    activities::create_activity(&teacher_ctx, req).await,
    Err(Error::Validation(_))
  ));

  let mut req = activity_request(child, "drawing");
  req.details = Some(json!({}));
  assert!(matches!(
    activities::create_activity(&teacher_ctx, req).await,
    Err(Error::Validation(_))
  ));

  let mut req = activity_request(child, "meal");
  req.child_id = Some("bogus".to_owned());
  assert!(matches!(
    activities::create_activity(&teacher_ctx, req).await,
    Err(Error::Validation(_))
  ));

  let mut req = activity_request(child, "meal");
  req.child_id = None;
  assert!(matches!(
    activities::create_activity(&teacher_ctx, req).await,
    Err(Error::Validation(_))
  ));
}

// ─── Activity listing ────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_requires_child_id_and_access() {
  let (parent_ctx, parent) = ctx(Role::Parent).await;
  let child = seeded_child(&parent_ctx.store, parent, RecordId::generate()).await;

  assert!(matches!(
    activities::list_activities(&parent_ctx, ListActivitiesParams::default())
      .await,
    Err(Error::Validation(_))
  ));

  let stranger = RequestContext::new(
    caller(RecordId::generate(), Role::Parent),
    parent_ctx.store.clone(),
  );
  let params = ListActivitiesParams {
    child_id: Some(child.to_string()),
    ..ListActivitiesParams::default()
  };
  assert!(matches!(
    activities::list_activities(&stranger, params).await,
    Err(Error::Forbidden { .. })
  ));
}

#[tokio::test]
async fn listing_date_window_is_inclusive_of_both_days() {
  let (teacher_ctx, teacher) = ctx(Role::Teacher).await;
  let child =
    seeded_child(&teacher_ctx.store, RecordId::generate(), teacher).await;

  for (day, hour) in [(9, 12), (10, 23), (11, 0)] {
    let mut req = activity_request(child, "meal");
    req.created_at = Some(Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap());
    activities::create_activity(&teacher_ctx, req).await.unwrap();
  }

  let params = ListActivitiesParams {
    child_id:   Some(child.to_string()),
    start_date: Some("2026-03-09".to_owned()),
    end_date:   Some("2026-03-10".to_owned()),
    ..ListActivitiesParams::default()
  };
  let listed = activities::list_activities(&teacher_ctx, params)
    .await
    .unwrap();
  // The 23:00 activity on the end date is included; the next day is not.
  assert_eq!(listed.len(), 2);

  let params = ListActivitiesParams {
    child_id:   Some(child.to_string()),
    start_date: Some("March 9".to_owned()),
    ..ListActivitiesParams::default()
  };
  assert!(matches!(
    activities::list_activities(&teacher_ctx, params).await,
    Err(Error::Validation(_))
  ));
}

// ─── Activity deletion ───────────────────────────────────────────────────────

#[tokio::test]
async fn deletion_requires_a_supervising_teacher() {
  let (teacher_ctx, teacher) = ctx(Role::Teacher).await;
  let parent = RecordId::generate();
  let child = seeded_child(&teacher_ctx.store, parent, teacher).await;
  let id = activities::create_activity(&teacher_ctx, activity_request(child, "meal"))
    .await
    .unwrap();

  let parent_ctx =
    RequestContext::new(caller(parent, Role::Parent), teacher_ctx.store.clone());
  assert!(matches!(
    activities::delete_activity(&parent_ctx, &id.to_string()).await,
    Err(Error::Forbidden { .. })
  ));

  let other_teacher = RequestContext::new(
    caller(RecordId::generate(), Role::Teacher),
    teacher_ctx.store.clone(),
  );
  assert!(matches!(
    activities::delete_activity(&other_teacher, &id.to_string()).await,
    Err(Error::Forbidden { .. })
  ));

  activities::delete_activity(&teacher_ctx, &id.to_string())
    .await
    .unwrap();
  assert!(matches!(
    activities::delete_activity(&teacher_ctx, &id.to_string()).await,
    Err(Error::NotFound(_))
  ));
}

#[tokio::test]
async fn deleting_with_a_malformed_id_is_not_found() {
  let (teacher_ctx, _) = ctx(Role::Teacher).await;
  assert!(matches!(
    activities::delete_activity(&teacher_ctx, "not-an-id").await,
    Err(Error::NotFound(_))
  ));
}
