//! Handlers for `/group` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/group` | Body: `{"user_id":"u1"}`; 201 with the new `group_id` |
//! | `POST` | `/group/invite` | Body: `{"group_id","invitee","user_id"}` |
//! | `POST` | `/group/accept` | Body: `{"user_id","group_id","accepted"}` |
//!
//! Any other operation segment is rejected with 400 before a body is read.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use hearth_core::{Resolution, group, store::DocumentStore};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{ApiState, error::ApiError};

/// The operations reachable under `/group/{operation}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperation {
  Invite,
  Accept,
}

/// Success body for every group endpoint.
#[derive(Debug, Serialize)]
pub struct GroupReply {
  pub message:  String,
  pub group_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub outcome:  Option<Resolution>,
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub user_id: String,
}

/// `POST /group` — body: `{"user_id":"u1"}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(body) = payload?;
  let group_id = group::create_group(&*state.store, &body.user_id).await?;
  let reply = GroupReply {
    message: format!("Group {group_id} created successfully"),
    group_id,
    outcome: None,
  };
  Ok((StatusCode::CREATED, Json(reply)))
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InviteBody {
  pub group_id: String,
  pub invitee:  String,
  /// The inviter.
  pub user_id:  String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcceptBody {
  pub user_id:  String,
  pub group_id: String,
  pub accepted: bool,
}

/// `POST /group/{operation}`
///
/// The body is decoded against the operation's own schema only after the
/// operation is known.
pub async fn dispatch<S>(
  State(state): State<ApiState<S>>,
  Path(operation): Path<GroupOperation>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GroupReply>, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(body) = payload?;
  let reply = match operation {
    GroupOperation::Invite => invite(&state, decode(body)?).await?,
    GroupOperation::Accept => accept(&state, decode(body)?).await?,
  };
  Ok(Json(reply))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
  serde_json::from_value(body)
    .map_err(|e| ApiError::BadRequest(format!("failed to parse request body: {e}")))
}

async fn invite<S: DocumentStore>(
  state: &ApiState<S>,
  body: InviteBody,
) -> Result<GroupReply, ApiError> {
  state
    .writer
    .invite(&body.group_id, &body.user_id, &body.invitee)
    .await?;
  Ok(GroupReply {
    message:  "Invite sent successfully".into(),
    group_id: body.group_id,
    outcome:  None,
  })
}

async fn accept<S: DocumentStore>(
  state: &ApiState<S>,
  body: AcceptBody,
) -> Result<GroupReply, ApiError> {
  let outcome = state
    .resolver
    .resolve(&body.user_id, &body.group_id, body.accepted)
    .await?;
  let verb = if outcome.is_accepted() { "accepted" } else { "declined" };
  Ok(GroupReply {
    message:  format!("User {} {verb} group {}", body.user_id, body.group_id),
    group_id: body.group_id,
    outcome:  Some(outcome),
  })
}
