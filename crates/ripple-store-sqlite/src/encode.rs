//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as `YYYY-MM-DDTHH:MM:SSZ` text (the wire
//! format, second precision). Referring types are stored as their
//! textual enum names; unknown stored values normalise to `USER` on
//! the way out rather than failing the read.

use chrono::{DateTime, NaiveDateTime, Utc};
use ripple_core::{
  activity::ReferringType,
  assemble::{ActivityRow, ReferringRow},
  user::{User, last_seen::FORMAT},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.format(FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, FORMAT)
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ReferringType ───────────────────────────────────────────────────────────

pub fn encode_referring_type(t: ReferringType) -> &'static str { t.as_str() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:        String,
  pub name:      String,
  pub last_seen: Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:        self.id,
      name:      self.name,
      last_seen: self.last_seen.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a referring row; converts into the
/// core assembly input (normalisation happens there).
pub struct RawReferring {
  pub feed_id:        String,
  pub referring_type: String,
  pub referring_id:   String,
  pub user_id:        Option<String>,
}

impl RawReferring {
  pub fn into_row(self) -> ReferringRow {
    ReferringRow {
      feed_id:        self.feed_id,
      referring_type: self.referring_type,
      referring_id:   self.referring_id,
      user_id:        self.user_id,
    }
  }
}

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub feed_id:              String,
  pub action_text_template: String,
}

impl RawActivity {
  pub fn into_row(self) -> ActivityRow {
    ActivityRow {
      feed_id:              self.feed_id,
      action_text_template: self.action_text_template,
    }
  }
}
