//! Activity — one feed entry describing an action performed by one or
//! more subjects upon one or more objects.
//!
//! The entry is template-driven: `action_text_template` carries literal
//! `{subject}` / `{object}` placeholders that are substituted at render
//! time (see [`crate::render`]).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ─── Referring type ──────────────────────────────────────────────────────────

/// The kind of entity a referring points at.
///
/// Anything other than `POST` — including missing or unrecognised
/// values — normalises to `USER`. That permissive default is part of
/// the wire contract, not an error path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferringType {
  #[default]
  User,
  Post,
}

impl ReferringType {
  /// Normalise a raw type string. The single place where "unknown maps
  /// to USER" is decided; both the read and write paths go through it.
  pub fn normalize(raw: &str) -> Self {
    match raw.to_ascii_uppercase().as_str() {
      "POST" => Self::Post,
      _ => Self::User,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::User => "USER",
      Self::Post => "POST",
    }
  }
}

impl fmt::Display for ReferringType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ReferringType {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Ok(Self::normalize(&raw))
  }
}

// ─── Referring ───────────────────────────────────────────────────────────────

/// A typed reference appearing in a subject or object role.
///
/// `user_id` names the owner of a referenced post; for a user referring
/// it is absent (the reference is self-describing). The renderer
/// tolerates either state regardless of `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referring {
  pub id:      String,
  pub kind:    ReferringType,
  pub user_id: Option<String>,
}

/// Which of an activity's two referring lists is being talked about.
/// Used in error messages when a list turns out to be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferringSide {
  Subject,
  Object,
}

impl fmt::Display for ReferringSide {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Subject => f.write_str("subject"),
      Self::Object => f.write_str("object"),
    }
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// One activity feed entry, keyed by `feed_id`.
///
/// The activity exclusively owns its two referring lists; users are
/// referenced by id only. Both lists must be non-empty for rendering
/// to be well-defined — the renderer rejects the empty case rather
/// than indexing past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
  pub feed_id:              String,
  pub action_text_template: String,
  pub subject_referring:    Vec<Referring>,
  pub object_referring:     Vec<Referring>,
}

#[cfg(test)]
mod tests {
  use super::ReferringType;

  #[test]
  fn normalize_known_types() {
    assert_eq!(ReferringType::normalize("USER"), ReferringType::User);
    assert_eq!(ReferringType::normalize("POST"), ReferringType::Post);
  }

  #[test]
  fn normalize_is_case_insensitive() {
    assert_eq!(ReferringType::normalize("post"), ReferringType::Post);
    assert_eq!(ReferringType::normalize("Post"), ReferringType::Post);
  }

  #[test]
  fn normalize_unknown_defaults_to_user() {
    assert_eq!(ReferringType::normalize("COMMENT"), ReferringType::User);
    assert_eq!(ReferringType::normalize(""), ReferringType::User);
  }

  #[test]
  fn deserialize_unknown_defaults_to_user() {
    let t: ReferringType = serde_json::from_str("\"COMMENT\"").unwrap();
    assert_eq!(t, ReferringType::User);
  }

  #[test]
  fn serializes_as_enum_name() {
    assert_eq!(
      serde_json::to_string(&ReferringType::Post).unwrap(),
      "\"POST\""
    );
  }
}
