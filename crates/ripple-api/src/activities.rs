//! Handlers for activity feed endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/activities` | Optional `?viewer=<user id>` |
//! | `GET`  | `/users/:id/activities` | Activities where the user appears as subject or object |
//! | `POST` | `/users/-/activities` | Body: [`UpsertActivityBody`]; create-or-fully-replace |
//!
//! The `viewer` query parameter personalises the rendered sentences;
//! it must name an existing user.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ripple_core::{
  activity::{Activity, Referring, ReferringSide, ReferringType},
  render::{RenderedActivity, Viewer, render_activity},
  store::FeedStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Viewer resolution ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ViewerParams {
  pub viewer: Option<String>,
}

/// Look up the viewing user named by `?viewer=`, if any. An unknown
/// viewer id is a 404, not a silently unpersonalised listing.
async fn resolve_viewer<S>(
  store: &S,
  params: &ViewerParams,
) -> Result<Option<Viewer>, ApiError>
where
  S: FeedStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Some(id) = params.viewer.as_deref() else {
    return Ok(None);
  };
  let user = store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("viewer {id} not found")))?;
  Ok(Some(Viewer {
    id:   user.id,
    name: user.name,
  }))
}

/// Render a listing. Rows written by foreign writers may be
/// unrenderable (empty referring lists); those are omitted rather than
/// failing the whole listing — the write path here never produces them.
fn render_all(
  activities: &[Activity],
  viewer: Option<&Viewer>,
) -> Vec<RenderedActivity> {
  activities
    .iter()
    .filter_map(|a| render_activity(a, viewer).ok())
    .collect()
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /activities[?viewer=<user id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ViewerParams>,
) -> Result<Json<Vec<RenderedActivity>>, ApiError>
where
  S: FeedStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let viewer = resolve_viewer(store.as_ref(), &params).await?;
  let activities = store
    .list_activities()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(render_all(&activities, viewer.as_ref())))
}

// ─── List by participant ──────────────────────────────────────────────────────

/// `GET /users/:id/activities[?viewer=...]` — activities whose subject
/// OR object referring list contains the user id.
pub async fn list_for_user<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Query(params): Query<ViewerParams>,
) -> Result<Json<Vec<RenderedActivity>>, ApiError>
where
  S: FeedStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let viewer = resolve_viewer(store.as_ref(), &params).await?;
  let mut activities = store
    .list_activities()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  activities.retain(|a| {
    a.subject_referring.iter().any(|r| r.id == id)
      || a.object_referring.iter().any(|r| r.id == id)
  });

  Ok(Json(render_all(&activities, viewer.as_ref())))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

/// One referring item in an upsert body. `id` is required; a missing
/// or unrecognised `type` defaults to `USER`; `userId` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferringBody {
  pub id:      Option<String>,
  #[serde(default, rename = "type")]
  pub kind:    ReferringType,
  pub user_id: Option<String>,
}

/// JSON body accepted by `POST /users/-/activities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertActivityBody {
  pub feed_id:              Option<String>,
  pub action_text_template: Option<String>,
  #[serde(default)]
  pub subject_referring:    Vec<ReferringBody>,
  #[serde(default)]
  pub object_referring:     Vec<ReferringBody>,
}

impl UpsertActivityBody {
  fn into_activity(self) -> Result<Activity, ApiError> {
    let feed_id = self.feed_id.ok_or_else(|| {
      ApiError::Validation("missing required field \"feedId\"".into())
    })?;
    let action_text_template = self.action_text_template.ok_or_else(|| {
      ApiError::Validation(
        "missing required field \"actionTextTemplate\"".into(),
      )
    })?;

    let subject_referring =
      convert_referring(self.subject_referring, "subjectReferring")?;
    let object_referring =
      convert_referring(self.object_referring, "objectReferring")?;

    // An activity with an empty referring list can never be rendered;
    // reject it here, before the store is touched, so a failed upsert
    // leaves prior state unchanged.
    let empty_side = if subject_referring.is_empty() {
      Some(ReferringSide::Subject)
    } else if object_referring.is_empty() {
      Some(ReferringSide::Object)
    } else {
      None
    };
    if let Some(side) = empty_side {
      return Err(ripple_core::Error::EmptyReferring { feed_id, side }.into());
    }

    Ok(Activity {
      feed_id,
      action_text_template,
      subject_referring,
      object_referring,
    })
  }
}

fn convert_referring(
  items: Vec<ReferringBody>,
  field: &str,
) -> Result<Vec<Referring>, ApiError> {
  items
    .into_iter()
    .map(|item| {
      let id = item.id.ok_or_else(|| {
        ApiError::Validation(format!(
          "missing required field \"id\" in {field}"
        ))
      })?;
      Ok(Referring {
        id,
        kind: item.kind,
        user_id: item.user_id,
      })
    })
    .collect()
}

/// `POST /users/-/activities[?viewer=...]` — create-or-fully-replace
/// keyed by feed id; responds 201 with the freshly loaded and rendered
/// activity, so the caller sees exactly what persisted.
pub async fn upsert<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ViewerParams>,
  Json(body): Json<UpsertActivityBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let viewer = resolve_viewer(store.as_ref(), &params).await?;
  let activity = body.into_activity()?;
  let feed_id = activity.feed_id.clone();

  store
    .upsert_activity(activity)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let stored = store
    .get_activity(&feed_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::Store(format!("activity {feed_id} vanished after upsert").into())
    })?;

  let rendered = render_activity(&stored, viewer.as_ref())?;
  Ok((StatusCode::CREATED, Json(rendered)))
}
