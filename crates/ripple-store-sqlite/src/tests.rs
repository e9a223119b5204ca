//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use ripple_core::{
  activity::{Activity, Referring, ReferringType},
  store::FeedStore,
  user::User,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn user(id: &str, name: &str) -> User {
  User {
    id:        id.into(),
    name:      name.into(),
    last_seen: None,
  }
}

fn user_referring(id: &str) -> Referring {
  Referring {
    id:      id.into(),
    kind:    ReferringType::User,
    user_id: None,
  }
}

fn post_referring(id: &str, owner: &str) -> Referring {
  Referring {
    id:      id.into(),
    kind:    ReferringType::Post,
    user_id: Some(owner.into()),
  }
}

fn activity(
  feed_id: &str,
  template: &str,
  subjects: Vec<Referring>,
  objects: Vec<Referring>,
) -> Activity {
  Activity {
    feed_id:              feed_id.into(),
    action_text_template: template.into(),
    subject_referring:    subjects,
    object_referring:     objects,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_user() {
  let s = store().await;
  s.insert_user(&user("1", "alice")).await.unwrap();

  let fetched = s.get_user("1").await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.name, "alice");
  assert!(fetched.last_seen.is_none());
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  let result = s.get_user("nobody").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_users_ordered_by_id() {
  let s = store().await;
  s.insert_user(&user("3", "carol")).await.unwrap();
  s.insert_user(&user("1", "alice")).await.unwrap();
  s.insert_user(&user("2", "bob")).await.unwrap();

  let users = s.list_users().await.unwrap();
  let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
  assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn last_seen_roundtrips_at_second_precision() {
  let s = store().await;
  let seen = Utc.with_ymd_and_hms(2024, 3, 9, 17, 30, 5).unwrap();
  s.insert_user(&User {
    id:        "1".into(),
    name:      "alice".into(),
    last_seen: Some(seen),
  })
  .await
  .unwrap();

  let fetched = s.get_user("1").await.unwrap().unwrap();
  assert_eq!(fetched.last_seen, Some(seen));
}

// ─── Upsert round-trip ───────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_then_load_returns_exactly_what_was_stored() {
  let s = store().await;
  let stored = activity(
    "feed42",
    "{subject} liked {object}",
    vec![user_referring("1")],
    vec![post_referring("99", "2")],
  );

  s.upsert_activity(stored.clone()).await.unwrap();

  let loaded = s.get_activity("feed42").await.unwrap().unwrap();
  assert_eq!(loaded, stored);
}

#[tokio::test]
async fn get_activity_missing_returns_none() {
  let s = store().await;
  let result = s.get_activity("feed404").await.unwrap();
  assert!(result.is_none());
}

// ─── Replace semantics ───────────────────────────────────────────────────────

#[tokio::test]
async fn second_upsert_fully_replaces_referring_lists() {
  let s = store().await;
  s.upsert_activity(activity(
    "feed42",
    "{subject} commented",
    vec![user_referring("1"), user_referring("2"), user_referring("3")],
    vec![post_referring("99", "2")],
  ))
  .await
  .unwrap();

  // Shorter lists and a new template; nothing from the first write
  // may survive.
  s.upsert_activity(activity(
    "feed42",
    "{subject} reacted",
    vec![user_referring("4")],
    vec![post_referring("100", "5")],
  ))
  .await
  .unwrap();

  let loaded = s.get_activity("feed42").await.unwrap().unwrap();
  assert_eq!(loaded.action_text_template, "{subject} reacted");
  assert_eq!(loaded.subject_referring.len(), 1);
  assert_eq!(loaded.subject_referring[0].id, "4");
  assert_eq!(loaded.object_referring.len(), 1);
  assert_eq!(loaded.object_referring[0].id, "100");
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_activities_ordered_by_feed_id_regardless_of_insertion() {
  let s = store().await;
  for feed_id in ["feed3", "feed1", "feed2"] {
    s.upsert_activity(activity(
      feed_id,
      "{subject} posted",
      vec![user_referring("1")],
      vec![user_referring("2")],
    ))
    .await
    .unwrap();
  }

  let activities = s.list_activities().await.unwrap();
  let ids: Vec<&str> =
    activities.iter().map(|a| a.feed_id.as_str()).collect();
  assert_eq!(ids, ["feed1", "feed2", "feed3"]);
}

#[tokio::test]
async fn list_activities_empty_store() {
  let s = store().await;
  assert!(s.list_activities().await.unwrap().is_empty());
}

// ─── Read-path normalisation ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_referring_type_on_disk_reads_back_as_user() {
  let s = store().await;
  s.upsert_activity(activity(
    "feed1",
    "{subject} posted",
    vec![user_referring("1")],
    vec![user_referring("2")],
  ))
  .await
  .unwrap();

  // A row written by an older or foreign writer with a type this
  // service does not know.
  s.execute_raw(
    "INSERT INTO activity_subject_referring
       (feed_id, referring_type, referring_id, user_id)
     VALUES ('feed1', 'COMMENT', 'x', NULL)",
  )
  .await
  .unwrap();

  let loaded = s.get_activity("feed1").await.unwrap().unwrap();
  let comment_row = loaded
    .subject_referring
    .iter()
    .find(|r| r.id == "x")
    .unwrap();
  assert_eq!(comment_row.kind, ReferringType::User);
}
