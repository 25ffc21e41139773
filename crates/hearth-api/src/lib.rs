//! JSON REST API for Hearth.
//!
//! Exposes an axum [`Router`] backed by any [`hearth_core::store::DocumentStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hearth_api::api_router(store.clone()))
//! ```

pub mod chores;
pub mod error;
pub mod groups;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use hearth_core::{InvitationResolver, InvitationWriter, store::DocumentStore};

pub use error::ApiError;
pub use groups::GroupOperation;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. The invitation components are
/// built once, around the same store handle.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub writer:   InvitationWriter<S>,
  pub resolver: InvitationResolver<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      writer:   self.writer.clone(),
      resolver: self.resolver.clone(),
    }
  }
}

impl<S: DocumentStore> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      writer: InvitationWriter::new(Arc::clone(&store)),
      resolver: InvitationResolver::new(Arc::clone(&store)),
      store,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    // Groups
    .route("/group", post(groups::create::<S>))
    .route("/group/{operation}", post(groups::dispatch::<S>))
    // Users
    .route(
      "/users/{user_id}",
      get(users::get_one::<S>)
        .put(users::upsert::<S>)
        .delete(users::remove::<S>),
    )
    .route("/users/{user_id}/groups", get(users::groups::<S>))
    .route("/users/{user_id}/invites", get(users::invites::<S>))
    // Chores
    .route("/chores", post(chores::create::<S>))
    .route("/groups/{group_id}/chores", get(chores::list::<S>))
    .with_state(ApiState::new(store))
}
