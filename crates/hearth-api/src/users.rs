//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users/{user_id}` | 404 if no profile |
//! | `PUT`    | `/users/{user_id}` | Body: `{"email"?, "user_name"?}` |
//! | `DELETE` | `/users/{user_id}` | 204, or 404 if no profile |
//! | `GET`    | `/users/{user_id}/groups` | `my_groups` mirror entries |
//! | `GET`    | `/users/{user_id}/invites` | Pending invitations |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use hearth_core::{
  document::Keyed,
  group,
  model::{Invitation, MyGroup, UserProfile},
  profile,
  store::DocumentStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /users/{user_id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Keyed<UserProfile>>, ApiError>
where
  S: DocumentStore + 'static,
{
  let found = profile::get_profile(&*state.store, &user_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
  Ok(Json(found))
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub email:     Option<String>,
  pub user_name: Option<String>,
}

/// `PUT /users/{user_id}` — creates the profile on first call.
pub async fn upsert<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
  payload: Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<Keyed<UserProfile>>, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(body) = payload?;
  profile::upsert_profile(&*state.store, &user_id, body.email, body.user_name).await?;
  let saved = profile::get_profile(&*state.store, &user_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
  Ok(Json(saved))
}

/// `DELETE /users/{user_id}`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore + 'static,
{
  if profile::delete_profile(&*state.store, &user_id).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("user {user_id} not found")))
  }
}

// ─── Listings ─────────────────────────────────────────────────────────────────

/// `GET /users/{user_id}/groups`
pub async fn groups<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Keyed<MyGroup>>>, ApiError>
where
  S: DocumentStore + 'static,
{
  Ok(Json(group::my_groups(&*state.store, &user_id).await?))
}

/// `GET /users/{user_id}/invites`
pub async fn invites<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Keyed<Invitation>>>, ApiError>
where
  S: DocumentStore + 'static,
{
  Ok(Json(group::pending_invites(&*state.store, &user_id).await?))
}
