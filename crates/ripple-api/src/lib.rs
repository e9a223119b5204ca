//! JSON REST API for the ripple activity feed.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ripple_core::store::FeedStore`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = ripple_api::api_router(store.clone());
//! ```

pub mod activities;
pub mod error;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ripple_core::store::FeedStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FeedStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Activities
    .route("/activities", get(activities::list::<S>))
    .route("/users/{id}/activities", get(activities::list_for_user::<S>))
    .route("/users/-/activities", post(activities::upsert::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
