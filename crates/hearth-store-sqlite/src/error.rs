//! Error type for `hearth-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] hearth_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored `fields` column did not hold a JSON object.
  #[error("document {0} is not a JSON object")]
  NotAnObject(String),

  #[error("cannot query on {0:?}")]
  UnsupportedOperand(serde_json::Value),

  /// The caller stopped waiting before the transaction committed.
  #[error("transaction cancelled before commit")]
  Cancelled,
}

impl Error {
  /// Whether this is SQLite refusing a lock another connection holds.
  pub fn is_busy(&self) -> bool {
    let sqlite = match self {
      Error::Sqlite(e) => e,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => e,
      _ => return false,
    };
    matches!(
      sqlite.sqlite_error_code(),
      Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
  }
}

impl From<Error> for hearth_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      busy if busy.is_busy() => hearth_core::Error::Conflict,
      other => hearth_core::Error::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
