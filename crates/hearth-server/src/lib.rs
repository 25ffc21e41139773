//! HTTP server for Hearth.
//!
//! Mounts the [`hearth_api`] router under `/api`, adds a health check, and
//! wraps everything in request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use hearth_core::store::DocumentStore;
use hearth_store_sqlite::DEFAULT_MAX_ATTEMPTS;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HEARTH_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                     String,
  pub port:                     u16,
  pub store_path:               PathBuf,
  /// Attempts a conflicting store transaction gets before it is aborted.
  pub transaction_max_attempts: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                     "127.0.0.1".to_string(),
      port:                     8080,
      store_path:               PathBuf::from("hearth.db"),
      transaction_max_attempts: DEFAULT_MAX_ATTEMPTS,
    }
  }
}

impl ServerConfig {
  /// `host:port`, suitable for binding.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: DocumentStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", hearth_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Tests ────────────────────────────────────────────────────────────────────
