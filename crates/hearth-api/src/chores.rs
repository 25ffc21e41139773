//! Handlers for chore endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/chores` | 201 with the new `chore_id` |
//! | `GET`  | `/groups/{group_id}/chores` | Oldest first |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use hearth_core::{
  chore::{self, NewChore},
  document::Keyed,
  model::{Chore, ChoreFrequency},
  store::DocumentStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// The creator.
  pub user_id:         String,
  pub group_id:        String,
  pub chore_name:      String,
  #[serde(default)]
  pub chore_details:   Option<String>,
  /// ISO 8601 date, e.g. `2024-06-01`.
  pub chore_due_date:  NaiveDate,
  pub chore_frequency: ChoreFrequency,
  #[serde(default)]
  pub chore_assignee:  Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateReply {
  pub message:  String,
  pub group_id: String,
  pub chore_id: String,
}

/// `POST /chores`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(body) = payload?;
  let group_id = body.group_id.clone();
  let chore_id = chore::add_chore(&*state.store, NewChore {
    group_id:        body.group_id,
    created_by:      body.user_id,
    chore_name:      body.chore_name,
    chore_details:   body.chore_details,
    chore_due_date:  body.chore_due_date,
    chore_frequency: body.chore_frequency,
    chore_assignee:  body.chore_assignee,
  })
  .await?;

  let reply = CreateReply {
    message: "Chore added successfully".into(),
    group_id,
    chore_id,
  };
  Ok((StatusCode::CREATED, Json(reply)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /groups/{group_id}/chores`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(group_id): Path<String>,
) -> Result<Json<Vec<Keyed<Chore>>>, ApiError>
where
  S: DocumentStore + 'static,
{
  Ok(Json(chore::list_chores(&*state.store, &group_id).await?))
}
