//! [`SqliteStore`] — the SQLite implementation of [`FeedStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use ripple_core::{
  activity::Activity,
  assemble::assemble_activities,
  store::FeedStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{RawActivity, RawReferring, RawUser, encode_dt, encode_referring_type},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ripple feed store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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

  /// Seed a user row. Registration lives outside this service; this
  /// exists for deployment seeding and tests.
  pub async fn insert_user(&self, user: &User) -> Result<()> {
    let id        = user.id.clone();
    let name      = user.name.clone();
    let last_seen = user.last_seen.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, name, last_seen) VALUES (?1, ?2, ?3)",
          rusqlite::params![id, name, last_seen],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run arbitrary DDL/DML, bypassing the typed API. Test-only; used
  /// to simulate rows written by older or foreign writers.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FeedStore impl ──────────────────────────────────────────────────────────

impl FeedStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, last_seen FROM users ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUser {
              id:        row.get(0)?,
              name:      row.get(1)?,
              last_seen: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn get_user(&self, id: &str) -> Result<Option<User>> {
    let id_owned = id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, last_seen FROM users WHERE id = ?1",
              rusqlite::params![id_owned],
              |row| {
                Ok(RawUser {
                  id:        row.get(0)?,
                  name:      row.get(1)?,
                  last_seen: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn list_activities(&self) -> Result<Vec<Activity>> {
    let (activity_raws, subject_raws, object_raws) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT feed_id, action_text_template FROM activities
           ORDER BY feed_id",
        )?;
        let activities = stmt
          .query_map([], |row| {
            Ok(RawActivity {
              feed_id:              row.get(0)?,
              action_text_template: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT feed_id, referring_type, referring_id, user_id
           FROM activity_subject_referring
           ORDER BY feed_id, referring_id",
        )?;
        let subjects = stmt
          .query_map([], |row| {
            Ok(RawReferring {
              feed_id:        row.get(0)?,
              referring_type: row.get(1)?,
              referring_id:   row.get(2)?,
              user_id:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT feed_id, referring_type, referring_id, user_id
           FROM activity_object_referring
           ORDER BY feed_id, referring_id",
        )?;
        let objects = stmt
          .query_map([], |row| {
            Ok(RawReferring {
              feed_id:        row.get(0)?,
              referring_type: row.get(1)?,
              referring_id:   row.get(2)?,
              user_id:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((activities, subjects, objects))
      })
      .await?;

    Ok(assemble_activities(
      activity_raws.into_iter().map(RawActivity::into_row).collect(),
      subject_raws.into_iter().map(RawReferring::into_row).collect(),
      object_raws.into_iter().map(RawReferring::into_row).collect(),
    ))
  }

  async fn get_activity(&self, feed_id: &str) -> Result<Option<Activity>> {
    let feed_id_owned = feed_id.to_owned();

    let (activity_raws, subject_raws, object_raws) = self
      .conn
      .call(move |conn| {
        let activity = conn
          .query_row(
            "SELECT feed_id, action_text_template FROM activities
             WHERE feed_id = ?1",
            rusqlite::params![feed_id_owned],
            |row| {
              Ok(RawActivity {
                feed_id:              row.get(0)?,
                action_text_template: row.get(1)?,
              })
            },
          )
          .optional()?;

        let activities: Vec<RawActivity> = activity.into_iter().collect();
        if activities.is_empty() {
          return Ok((activities, Vec::new(), Vec::new()));
        }

        let mut stmt = conn.prepare(
          "SELECT feed_id, referring_type, referring_id, user_id
           FROM activity_subject_referring
           WHERE feed_id = ?1
           ORDER BY referring_id",
        )?;
        let subjects = stmt
          .query_map(rusqlite::params![feed_id_owned], |row| {
            Ok(RawReferring {
              feed_id:        row.get(0)?,
              referring_type: row.get(1)?,
              referring_id:   row.get(2)?,
              user_id:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT feed_id, referring_type, referring_id, user_id
           FROM activity_object_referring
           WHERE feed_id = ?1
           ORDER BY referring_id",
        )?;
        let objects = stmt
          .query_map(rusqlite::params![feed_id_owned], |row| {
            Ok(RawReferring {
              feed_id:        row.get(0)?,
              referring_type: row.get(1)?,
              referring_id:   row.get(2)?,
              user_id:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((activities, subjects, objects))
      })
      .await?;

    Ok(
      assemble_activities(
        activity_raws.into_iter().map(RawActivity::into_row).collect(),
        subject_raws.into_iter().map(RawReferring::into_row).collect(),
        object_raws.into_iter().map(RawReferring::into_row).collect(),
      )
      .into_iter()
      .next(),
    )
  }

  async fn upsert_activity(&self, activity: Activity) -> Result<()> {
    let feed_id  = activity.feed_id;
    let template = activity.action_text_template;

    // (type, id, user_id) triples, pre-encoded for the closure.
    let encode = |list: Vec<ripple_core::activity::Referring>| {
      list
        .into_iter()
        .map(|r| (encode_referring_type(r.kind).to_owned(), r.id, r.user_id))
        .collect::<Vec<_>>()
    };
    let subject_rows = encode(activity.subject_referring);
    let object_rows  = encode(activity.object_referring);

    self
      .conn
      .call(move |conn| {
        // One transaction: template upsert plus delete-then-insert of
        // both referring lists. Partial application would leave an
        // activity with a template but no referring data.
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO activities (feed_id, action_text_template)
           VALUES (?1, ?2)
           ON CONFLICT(feed_id) DO UPDATE
           SET action_text_template = excluded.action_text_template",
          rusqlite::params![feed_id, template],
        )?;

        tx.execute(
          "DELETE FROM activity_subject_referring WHERE feed_id = ?1",
          rusqlite::params![feed_id],
        )?;
        tx.execute(
          "DELETE FROM activity_object_referring WHERE feed_id = ?1",
          rusqlite::params![feed_id],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO activity_subject_referring
               (feed_id, referring_type, referring_id, user_id)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (kind, id, user_id) in &subject_rows {
            stmt.execute(rusqlite::params![feed_id, kind, id, user_id])?;
          }
        }
        {
          let mut stmt = tx.prepare(
            "INSERT INTO activity_object_referring
               (feed_id, referring_type, referring_id, user_id)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (kind, id, user_id) in &object_rows {
            stmt.execute(rusqlite::params![feed_id, kind, id, user_id])?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
