//! Assembly of flat row-like inputs into nested [`Activity`] entities.
//!
//! Storage backends read three flat result sets (activities, subject
//! referring rows, object referring rows) and hand them here; the
//! nesting logic stays pure and testable without a database.

use std::collections::HashMap;

use crate::activity::{Activity, Referring, ReferringType};

/// One row of the activities result set.
#[derive(Debug, Clone)]
pub struct ActivityRow {
  pub feed_id:              String,
  pub action_text_template: String,
}

/// One row of a referring result set. `referring_type` is the raw
/// stored string; it is normalised here (unknown → `USER`).
#[derive(Debug, Clone)]
pub struct ReferringRow {
  pub feed_id:        String,
  pub referring_type: String,
  pub referring_id:   String,
  pub user_id:        Option<String>,
}

impl ReferringRow {
  fn into_referring(self) -> Referring {
    Referring {
      id:      self.referring_id,
      kind:    ReferringType::normalize(&self.referring_type),
      user_id: self.user_id,
    }
  }
}

/// Nest referring rows under their activities.
///
/// The output is ordered by `feed_id` ascending. Referring rows whose
/// `feed_id` matches no activity are silently dropped (they reference
/// an activity that was deleted or never existed). Within one activity
/// the relative order of the input rows is preserved; callers are
/// expected to pre-sort rows by a stable ordering (feed id, then
/// referring id) before calling.
pub fn assemble_activities(
  activity_rows: Vec<ActivityRow>,
  subject_rows: Vec<ReferringRow>,
  object_rows: Vec<ReferringRow>,
) -> Vec<Activity> {
  let mut activities: Vec<Activity> = activity_rows
    .into_iter()
    .map(|row| Activity {
      feed_id:              row.feed_id,
      action_text_template: row.action_text_template,
      subject_referring:    Vec::new(),
      object_referring:     Vec::new(),
    })
    .collect();
  activities.sort_by(|a, b| a.feed_id.cmp(&b.feed_id));

  let index: HashMap<String, usize> = activities
    .iter()
    .enumerate()
    .map(|(i, a)| (a.feed_id.clone(), i))
    .collect();

  for row in subject_rows {
    if let Some(&i) = index.get(&row.feed_id) {
      activities[i].subject_referring.push(row.into_referring());
    }
  }
  for row in object_rows {
    if let Some(&i) = index.get(&row.feed_id) {
      activities[i].object_referring.push(row.into_referring());
    }
  }

  activities
}

#[cfg(test)]
mod tests {
  use super::*;

  fn activity_row(feed_id: &str) -> ActivityRow {
    ActivityRow {
      feed_id:              feed_id.into(),
      action_text_template: "{subject} did a thing".into(),
    }
  }

  fn referring_row(feed_id: &str, kind: &str, id: &str) -> ReferringRow {
    ReferringRow {
      feed_id:        feed_id.into(),
      referring_type: kind.into(),
      referring_id:   id.into(),
      user_id:        None,
    }
  }

  #[test]
  fn orders_by_feed_id_ascending() {
    let activities = assemble_activities(
      vec![activity_row("feed3"), activity_row("feed1"), activity_row("feed2")],
      vec![],
      vec![],
    );
    let ids: Vec<&str> =
      activities.iter().map(|a| a.feed_id.as_str()).collect();
    assert_eq!(ids, ["feed1", "feed2", "feed3"]);
  }

  #[test]
  fn nests_rows_under_their_activity() {
    let activities = assemble_activities(
      vec![activity_row("feed1"), activity_row("feed2")],
      vec![
        referring_row("feed1", "USER", "u1"),
        referring_row("feed2", "USER", "u2"),
      ],
      vec![referring_row("feed1", "POST", "p9")],
    );

    assert_eq!(activities[0].subject_referring.len(), 1);
    assert_eq!(activities[0].subject_referring[0].id, "u1");
    assert_eq!(activities[0].object_referring[0].id, "p9");
    assert_eq!(activities[0].object_referring[0].kind, ReferringType::Post);
    assert_eq!(activities[1].subject_referring[0].id, "u2");
    assert!(activities[1].object_referring.is_empty());
  }

  #[test]
  fn drops_orphan_referring_rows() {
    let activities = assemble_activities(
      vec![activity_row("feed1")],
      vec![referring_row("feed-gone", "USER", "u1")],
      vec![referring_row("feed-gone", "POST", "p1")],
    );
    assert_eq!(activities.len(), 1);
    assert!(activities[0].subject_referring.is_empty());
    assert!(activities[0].object_referring.is_empty());
  }

  #[test]
  fn preserves_input_row_order_within_an_activity() {
    let activities = assemble_activities(
      vec![activity_row("feed1")],
      vec![
        referring_row("feed1", "USER", "b"),
        referring_row("feed1", "USER", "a"),
        referring_row("feed1", "USER", "c"),
      ],
      vec![],
    );
    let ids: Vec<&str> = activities[0]
      .subject_referring
      .iter()
      .map(|r| r.id.as_str())
      .collect();
    assert_eq!(ids, ["b", "a", "c"]);
  }

  #[test]
  fn unknown_referring_type_normalizes_to_user() {
    let activities = assemble_activities(
      vec![activity_row("feed1")],
      vec![referring_row("feed1", "COMMENT", "x")],
      vec![],
    );
    assert_eq!(
      activities[0].subject_referring[0].kind,
      ReferringType::User
    );
  }
}
