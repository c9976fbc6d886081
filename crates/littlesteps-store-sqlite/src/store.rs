//! [`SqliteStore`] — the SQLite implementation of [`CareStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use littlesteps_core::{
  RecordId,
  activity::{Activity, NewActivity},
  child::{Child, ChildSummary, NewChild},
  store::{ActivityFilter, CareStore},
  update::ChildUpdate,
};

use crate::{
  Error, Result,
  encode::{
    RawActivity, RawChild, RawSummary, encode_date, encode_dt, encode_id,
    encode_ids,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A littlesteps care store backed by a single SQLite database.
///
/// Clones share one reference-counted connection. A store is opened per
/// request scope and closed when the last clone drops, on every exit path.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// `path` accepts SQLite URI forms (`file:...?mode=memory&cache=shared`),
  /// which the tests use to share one database across connections.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Membership test against one of the JSON id-set columns.
  async fn id_set_contains(
    &self,
    column: &'static str,
    identity: RecordId,
    child: RecordId,
  ) -> Result<bool> {
    let identity_str = encode_id(identity);
    let child_str = encode_id(child);

    let member: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT EXISTS (
                   SELECT 1 FROM json_each({column}) WHERE value = ?1
                 )
                 FROM children WHERE child_id = ?2"
              ),
              rusqlite::params![identity_str, child_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    // No row means the child does not exist: false, never an error.
    Ok(member.unwrap_or(false))
  }

  /// `{_id, name}` projection of children whose id-set column contains
  /// `identity`.
  async fn list_children_by_membership(
    &self,
    column: &'static str,
    identity: RecordId,
  ) -> Result<Vec<ChildSummary>> {
    let identity_str = encode_id(identity);

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT child_id, name FROM children
           WHERE EXISTS (
             SELECT 1 FROM json_each(children.{column}) WHERE value = ?1
           )"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![identity_str], |row| {
            Ok(RawSummary {
              child_id: row.get(0)?,
              name:     row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }
}

// ─── CareStore impl ──────────────────────────────────────────────────────────

impl CareStore for SqliteStore {
  type Error = Error;

  // ── Children ──────────────────────────────────────────────────────────────

  async fn create_child(
    &self,
    new: NewChild,
    initial_parent: RecordId,
  ) -> Result<RecordId> {
    let id = RecordId::generate();

    let id_str        = encode_id(id);
    let birthday_str  = encode_date(new.birthday);
    let allergies_str = serde_json::to_string(&new.allergies)?;
    let parents_str   = encode_ids(&[initial_parent])?;
    let created_str   = encode_dt(Utc::now());
    let name          = new.name;
    let group         = new.group;
    let notes         = new.notes;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO children (
             child_id, name, birthday, group_label, allergies, notes,
             parent_ids, supervisor_ids, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '[]', ?8)",
          rusqlite::params![
            id_str,
            name,
            birthday_str,
            group,
            allergies_str,
            notes,
            parents_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  async fn get_child(&self, id: RecordId) -> Result<Option<Child>> {
    let id_str = encode_id(id);

    let raw: Option<RawChild> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT child_id, name, birthday, group_label, allergies,
                      notes, parent_ids, supervisor_ids, created_at
               FROM children WHERE child_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawChild {
                  child_id:       row.get(0)?,
                  name:           row.get(1)?,
                  birthday:       row.get(2)?,
                  group_label:    row.get(3)?,
                  allergies:      row.get(4)?,
                  notes:          row.get(5)?,
                  parent_ids:     row.get(6)?,
                  supervisor_ids: row.get(7)?,
                  created_at:     row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawChild::into_child).transpose()
  }

  async fn update_child(&self, id: RecordId, update: ChildUpdate) -> Result<bool> {
    // An empty update never touches the backing store.
    if update.is_empty() {
      return Ok(false);
    }

    let mut columns: Vec<&'static str> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(name) = update.name {
      columns.push("name");
      values.push(name);
    }
    if let Some(birthday) = update.birthday {
      columns.push("birthday");
      values.push(encode_date(birthday));
    }
    if let Some(group) = update.group {
      columns.push("group_label");
      values.push(group);
    }
    if let Some(allergies) = update.allergies {
      columns.push("allergies");
      values.push(serde_json::to_string(&allergies)?);
    }
    if let Some(notes) = update.notes {
      columns.push("notes");
      values.push(notes);
    }

    values.push(encode_id(id));

    let matched: usize = self
      .conn
      .call(move |conn| {
        let assignments: Vec<String> = columns
          .iter()
          .enumerate()
          .map(|(i, col)| format!("{col} = ?{}", i + 1))
          .collect();
        let sql = format!(
          "UPDATE children SET {} WHERE child_id = ?{}",
          assignments.join(", "),
          values.len(),
        );
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;

    Ok(matched > 0)
  }

  async fn add_supervisor(
    &self,
    child: RecordId,
    supervisor: RecordId,
  ) -> Result<bool> {
    let child_str = encode_id(child);
    let sup_str = encode_id(supervisor);

    let existed: bool = self
      .conn
      .call(move |conn| {
        let existed: bool = conn
          .query_row(
            "SELECT 1 FROM children WHERE child_id = ?1",
            rusqlite::params![child_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if existed {
          // Atomic set-add: the filter makes re-adding a present id a
          // no-op, so concurrent callers cannot produce duplicates.
          conn.execute(
            "UPDATE children
             SET supervisor_ids = json_insert(supervisor_ids, '$[#]', ?1)
             WHERE child_id = ?2
               AND NOT EXISTS (
                 SELECT 1 FROM json_each(supervisor_ids) WHERE value = ?1
               )",
            rusqlite::params![sup_str, child_str],
          )?;
        }

        Ok(existed)
      })
      .await?;

    Ok(existed)
  }

  // ── Relationship queries ──────────────────────────────────────────────────

  async fn is_parent_of(&self, identity: RecordId, child: RecordId) -> Result<bool> {
    self.id_set_contains("parent_ids", identity, child).await
  }

  async fn is_supervisor_of(
    &self,
    identity: RecordId,
    child: RecordId,
  ) -> Result<bool> {
    self.id_set_contains("supervisor_ids", identity, child).await
  }

  async fn list_children_for_parent(
    &self,
    identity: RecordId,
  ) -> Result<Vec<ChildSummary>> {
    self.list_children_by_membership("parent_ids", identity).await
  }

  async fn list_children_for_supervisor(
    &self,
    identity: RecordId,
  ) -> Result<Vec<ChildSummary>> {
    self
      .list_children_by_membership("supervisor_ids", identity)
      .await
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn create_activity(&self, new: NewActivity) -> Result<RecordId> {
    let id = RecordId::generate();

    let id_str      = encode_id(id);
    let child_str   = encode_id(new.child_id);
    let logger_str  = encode_id(new.logged_by);
    let details_str = serde_json::to_string(&new.details)?;
    // Caller-supplied timestamps are preserved; otherwise insertion time.
    let created_str = encode_dt(new.created_at.unwrap_or_else(Utc::now));
    let kind        = new.kind;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (
             activity_id, child_id, kind, details, logged_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            child_str,
            kind,
            details_str,
            logger_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  async fn get_activity(&self, id: RecordId) -> Result<Option<Activity>> {
    let id_str = encode_id(id);

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT activity_id, child_id, kind, details, logged_by,
                      created_at
               FROM activities WHERE activity_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawActivity {
                  activity_id: row.get(0)?,
                  child_id:    row.get(1)?,
                  kind:        row.get(2)?,
                  details:     row.get(3)?,
                  logged_by:   row.get(4)?,
                  created_at:  row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn list_activities<'a>(
    &'a self,
    child: RecordId,
    filter: &'a ActivityFilter,
  ) -> Result<Vec<Activity>> {
    let child_str = encode_id(child);
    let kind      = filter.kind.clone();
    let start_str = filter.start.map(encode_dt);
    let end_str   = filter.end.map(encode_dt);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        // Build the WHERE clause dynamically; timestamps compare
        // lexicographically thanks to the fixed-width encoding.
        let mut conds: Vec<String> = vec!["child_id = ?1".into()];
        let mut values: Vec<String> = vec![child_str];

        if let Some(kind) = kind {
          values.push(kind);
          conds.push(format!("kind = ?{}", values.len()));
        }
        if let Some(start) = start_str {
          values.push(start);
          conds.push(format!("created_at >= ?{}", values.len()));
        }
        if let Some(end) = end_str {
          values.push(end);
          conds.push(format!("created_at < ?{}", values.len()));
        }

        let sql = format!(
          "SELECT activity_id, child_id, kind, details, logged_by, created_at
           FROM activities
           WHERE {}
           ORDER BY created_at DESC",
          conds.join(" AND "),
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), |row| {
            Ok(RawActivity {
              activity_id: row.get(0)?,
              child_id:    row.get(1)?,
              kind:        row.get(2)?,
              details:     row.get(3)?,
              logged_by:   row.get(4)?,
              created_at:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn delete_activity(&self, id: RecordId) -> Result<bool> {
    let id_str = encode_id(id);

    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM activities WHERE activity_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
