//! Activity rendering — turns an [`Activity`] plus an optional viewing
//! user into the display-ready view returned by the API.
//!
//! Everything here is a pure transformation; no I/O, no shared state,
//! safe to call from any number of request tasks.

use serde::Serialize;

use crate::{
  Error, Result,
  activity::{Activity, Referring, ReferringSide, ReferringType},
};

// ─── Viewer ──────────────────────────────────────────────────────────────────

/// The identity an activity's sentence is personalised for. Absent for
/// unpersonalised listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
  pub id:   String,
  pub name: String,
}

// ─── Rendered view ───────────────────────────────────────────────────────────

/// A `{type, id}` pair in the rendered view; the type serialises as its
/// textual enum name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferringRef {
  #[serde(rename = "type")]
  pub kind: ReferringType,
  pub id:   String,
}

impl From<&Referring> for ReferringRef {
  fn from(r: &Referring) -> Self {
    Self {
      kind: r.kind,
      id:   r.id.clone(),
    }
  }
}

/// The display-ready form of one activity.
///
/// Serialises to exactly the wire shape clients expect: `feedId`, the
/// two normalised referring lists, the raw template, and the rendered
/// `actionText`. The computed phrases are carried for callers but are
/// not part of the wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedActivity {
  pub feed_id:              String,
  pub subject_referring:    Vec<ReferringRef>,
  pub object_referring:     Vec<ReferringRef>,
  pub action_text_template: String,
  pub action_text:          String,
  #[serde(skip)]
  pub subject_phrase:       String,
  #[serde(skip)]
  pub object_phrase:        String,
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Collapse one referring list into its display phrase.
///
/// More than one element renders as `"<last id> and <N-1> others"` —
/// the last element in listed order is the one named, as a fixed
/// tie-break. A single referring matching the viewer renders as the
/// raw id; anyone else (or no viewer at all) renders as the literal
/// `"you"`. The single-element branches are kept exactly as shipped
/// for wire compatibility with existing clients.
///
/// Returns `None` when the list is empty.
pub fn referring_phrase(
  list: &[Referring],
  viewer: Option<&Viewer>,
) -> Option<String> {
  let last = list.last()?;
  if list.len() > 1 {
    Some(format!("{} and {} others", last.id, list.len() - 1))
  } else if viewer.is_some_and(|v| v.id == last.id) {
    Some(last.id.clone())
  } else {
    Some("you".to_string())
  }
}

/// Uppercase the first character, leaving the rest unchanged. The
/// empty string maps to itself.
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Render one activity for `viewer`.
///
/// Both `{subject}` and `{object}` placeholders resolve to the viewer's
/// name (empty when there is no viewer), never to the computed
/// phrases; the rendered sentence names only the viewing user. An
/// empty referring list on either side is an error, not a fault.
pub fn render_activity(
  activity: &Activity,
  viewer: Option<&Viewer>,
) -> Result<RenderedActivity> {
  let subject_phrase = referring_phrase(&activity.subject_referring, viewer)
    .ok_or_else(|| Error::EmptyReferring {
      feed_id: activity.feed_id.clone(),
      side:    ReferringSide::Subject,
    })?;
  let object_phrase = referring_phrase(&activity.object_referring, viewer)
    .ok_or_else(|| Error::EmptyReferring {
      feed_id: activity.feed_id.clone(),
      side:    ReferringSide::Object,
    })?;

  let viewer_name = viewer.map(|v| v.name.as_str()).unwrap_or("");
  let substituted = activity
    .action_text_template
    .replace("{subject}", viewer_name)
    .replace("{object}", viewer_name);
  let action_text = capitalize_first(&substituted);

  Ok(RenderedActivity {
    feed_id: activity.feed_id.clone(),
    subject_referring: activity
      .subject_referring
      .iter()
      .map(ReferringRef::from)
      .collect(),
    object_referring: activity
      .object_referring
      .iter()
      .map(ReferringRef::from)
      .collect(),
    action_text_template: activity.action_text_template.clone(),
    action_text,
    subject_phrase,
    object_phrase,
  })
}
