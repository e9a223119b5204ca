//! User — the account entity referenced by activity feed entries.
//!
//! Users are created by an external registration process; this service
//! only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account. `last_seen` is absent when never recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:        String,
  pub name:      String,
  #[serde(default, with = "last_seen")]
  pub last_seen: Option<DateTime<Utc>>,
}

/// Wire format for `lastSeen`: ISO-8601 UTC with second precision
/// (`YYYY-MM-DDTHH:MM:SSZ`), `null` when never recorded.
pub mod last_seen {
  use chrono::{DateTime, NaiveDateTime, Utc};
  use serde::{Deserialize as _, Deserializer, Serializer};

  pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

  pub fn serialize<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(
    deserializer: D,
  ) -> Result<Option<DateTime<Utc>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw
      .map(|s| {
        NaiveDateTime::parse_from_str(&s, FORMAT)
          .map(|naive| naive.and_utc())
          .map_err(serde::de::Error::custom)
      })
      .transpose()
  }
}
