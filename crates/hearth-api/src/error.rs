//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// The request body was missing, not JSON, or the wrong shape.
  #[error("failed to parse request body: {}", .0.body_text())]
  Body(#[from] JsonRejection),

  #[error(transparent)]
  Core(#[from] hearth_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    use hearth_core::Error as E;
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Body(rejection) => rejection.status(),
      ApiError::Core(e) => match e {
        E::Validation(_) => StatusCode::BAD_REQUEST,
        E::AlreadyMember { .. } => StatusCode::CONFLICT,
        E::InviteNotFound { .. } => StatusCode::NOT_FOUND,
        E::Conflict | E::TransactionAborted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        E::Store(_) | E::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(error = %self, "request failed");
    }

    let mut body = Map::new();
    body.insert("message".into(), Value::String(self.to_string()));
    if let ApiError::Core(e) = &self
      && let Some(group_id) = e.group_id()
    {
      body.insert("group_id".into(), Value::String(group_id.to_owned()));
    }
    (status, Json(Value::Object(body))).into_response()
  }
}
