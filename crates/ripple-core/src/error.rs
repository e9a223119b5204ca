//! Error types for `ripple-core`.

use thiserror::Error;

use crate::activity::ReferringSide;

#[derive(Debug, Error)]
pub enum Error {
  /// An activity reached the renderer with nothing in one of its
  /// referring lists; there is no last element to name in the phrase.
  #[error("activity {feed_id:?} has an empty {side} referring list")]
  EmptyReferring {
    feed_id: String,
    side:    ReferringSide,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
