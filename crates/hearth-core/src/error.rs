//! Error types for `hearth-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required identifier was missing or not a usable path segment.
  #[error("{0}")]
  Validation(String),

  #[error("user {user_id} is already a member of group {group_id}")]
  AlreadyMember { group_id: String, user_id: String },

  #[error("no invite found for user {user_id} in group {group_id}")]
  InviteNotFound { group_id: String, user_id: String },

  /// The backing store failed for a reason other than a write conflict.
  #[error("store unavailable: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// An optimistic-concurrency conflict. Raised inside a transaction body;
  /// the store retries the body when it sees this.
  #[error("transaction conflict")]
  Conflict,

  #[error("transaction aborted after {attempts} attempts")]
  TransactionAborted { attempts: u32 },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend failure.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// The group this error concerns, when it carries one.
  pub fn group_id(&self) -> Option<&str> {
    match self {
      Self::AlreadyMember { group_id, .. }
      | Self::InviteNotFound { group_id, .. } => Some(group_id),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
