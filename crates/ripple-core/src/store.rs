//! The `FeedStore` trait — the repository abstraction behind the feed.
//!
//! The trait is implemented by storage backends (e.g.
//! `ripple-store-sqlite`). The HTTP layer depends on this abstraction,
//! not on any concrete backend, so the model and renderer stay pure
//! and testable without shared state.

use std::future::Future;

use crate::{activity::Activity, user::User};

/// Abstraction over a ripple storage backend.
///
/// Users are read-only here — they are created by an external
/// registration process. Activities support a single write operation:
/// create-or-fully-replace keyed by feed id.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// List all users, ordered by id.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Activities ────────────────────────────────────────────────────────

  /// List all activities, fully assembled, ordered by feed id.
  fn list_activities(
    &self,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  /// Retrieve one assembled activity. Returns `None` if not found.
  fn get_activity<'a>(
    &'a self,
    feed_id: &'a str,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + 'a;

  /// Create the activity if absent, otherwise fully replace it: the
  /// template is overwritten and both referring lists are deleted and
  /// re-inserted — never merged. Implementations must apply the whole
  /// replacement atomically; a failure leaves prior state unchanged.
  fn upsert_activity(
    &self,
    activity: Activity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
