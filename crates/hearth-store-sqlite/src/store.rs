//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use hearth_core::{
  document::{Document, Fields, SetMode},
  path::{CollectionPath, DocPath},
  store::{DocumentStore, Transaction},
};

use crate::{
  Error, Result,
  encode::{DOCUMENT_COLUMNS, RawDocument, encode_dt, encode_operand, field_path},
  schema::SCHEMA,
};

/// How many times a conflicting transaction runs before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Base delay between transaction attempts; grows linearly per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hearth document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:         tokio_rusqlite::Connection,
  max_attempts: u32,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn, max_attempts: DEFAULT_MAX_ATTEMPTS };
    store.init_schema().await?;
    Ok(store)
  }

  /// Set how many attempts a conflicting transaction gets. At least one
  /// attempt is always made.
  pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
    self.max_attempts = max_attempts.max(1);
    self
  }

  pub fn max_attempts(&self) -> u32 { self.max_attempts }

  /// Close the underlying connection, flushing the WAL.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread.
  async fn with_conn<R, F>(&self, f: F) -> Result<R>
  where
    R: Send + 'static,
    F: FnOnce(&Connection) -> Result<R> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Statements ──────────────────────────────────────────────────────────────

fn read(conn: &Connection, path: &DocPath) -> Result<Option<Document>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = ?1 AND doc_id = ?2"
      ),
      params![path.collection().as_str(), path.id()],
      RawDocument::from_row,
    )
    .optional()?;
  raw.map(RawDocument::into_document).transpose()
}

fn write(
  conn: &Connection,
  path: &DocPath,
  fields: &Fields,
  mode: SetMode,
  now: DateTime<Utc>,
) -> Result<()> {
  let mut resolved = fields.resolve(now);
  if mode == SetMode::Merge {
    if let Some(existing) = read(conn, path)? {
      let mut merged = existing.fields;
      merged.extend(resolved);
      resolved = merged;
    }
  }

  let json = serde_json::to_string(&Value::Object(resolved))?;
  conn.execute(
    "INSERT INTO documents (collection, doc_id, fields, create_time, update_time)
     VALUES (?1, ?2, ?3, ?4, ?4)
     ON CONFLICT(collection, doc_id) DO UPDATE SET
       fields = excluded.fields,
       update_time = excluded.update_time",
    params![path.collection().as_str(), path.id(), json, encode_dt(now)],
  )?;
  Ok(())
}

fn remove(conn: &Connection, path: &DocPath) -> Result<bool> {
  let n = conn.execute(
    "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
    params![path.collection().as_str(), path.id()],
  )?;
  Ok(n > 0)
}

fn select_where(
  conn: &Connection,
  collection: &CollectionPath,
  field: &str,
  equals: &Value,
  limit: usize,
) -> Result<Vec<Document>> {
  let json_path = field_path(field)?;
  let operand = encode_operand(equals)?;
  let limit = i64::try_from(limit).unwrap_or(i64::MAX);

  let mut stmt = conn.prepare(&format!(
    "SELECT {DOCUMENT_COLUMNS} FROM documents
     WHERE collection = ?1 AND json_extract(fields, ?2) = ?3
     ORDER BY create_time, doc_id
     LIMIT ?4"
  ))?;
  let rows = stmt
    .query_map(
      params![collection.as_str(), json_path, operand, limit],
      RawDocument::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows.into_iter().map(RawDocument::into_document).collect()
}

fn select_all(conn: &Connection, collection: &CollectionPath) -> Result<Vec<Document>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {DOCUMENT_COLUMNS} FROM documents
     WHERE collection = ?1
     ORDER BY create_time, doc_id"
  ))?;
  let rows = stmt
    .query_map(params![collection.as_str()], RawDocument::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows.into_iter().map(RawDocument::into_document).collect()
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// The [`Transaction`] handle lent to a body. Every write in one attempt
/// shares the same clock reading.
struct SqliteTx<'t> {
  conn: &'t Connection,
  now:  DateTime<Utc>,
}

impl Transaction for SqliteTx<'_> {
  fn get(&mut self, path: &DocPath) -> hearth_core::Result<Option<Document>> {
    Ok(read(self.conn, path)?)
  }

  fn query(
    &mut self,
    collection: &CollectionPath,
    field: &str,
    equals: &Value,
    limit: usize,
  ) -> hearth_core::Result<Vec<Document>> {
    Ok(select_where(self.conn, collection, field, equals, limit)?)
  }

  fn set(&mut self, path: &DocPath, fields: Fields, mode: SetMode) -> hearth_core::Result<()> {
    Ok(write(self.conn, path, &fields, mode, self.now)?)
  }

  fn delete(&mut self, path: &DocPath) -> hearth_core::Result<bool> {
    Ok(remove(self.conn, path)?)
  }
}

/// Set when the future awaiting a transaction is dropped.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
  fn drop(&mut self) { self.0.store(true, Ordering::SeqCst); }
}

/// One attempt: begin an immediate transaction, run `body`, commit. An error
/// anywhere drops the transaction, which rolls it back. Nothing commits once
/// `cancelled` is set.
fn attempt_once<T, F>(
  conn: &mut Connection,
  body: &mut F,
  cancelled: &AtomicBool,
) -> hearth_core::Result<T>
where
  F: FnMut(&mut dyn Transaction) -> hearth_core::Result<T>,
{
  if cancelled.load(Ordering::SeqCst) {
    return Err(Error::Cancelled.into());
  }
  let tx = conn
    .transaction_with_behavior(TransactionBehavior::Immediate)
    .map_err(Error::from)?;
  let value = {
    let mut handle = SqliteTx { conn: &*tx, now: Utc::now() };
    body(&mut handle)?
  };
  if cancelled.load(Ordering::SeqCst) {
    debug!("caller went away, rolling back");
    return Err(Error::Cancelled.into());
  }
  tx.commit().map_err(Error::from)?;
  Ok(value)
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  async fn get(&self, path: DocPath) -> hearth_core::Result<Option<Document>> {
    Ok(self.with_conn(move |conn| read(conn, &path)).await?)
  }

  async fn set(&self, path: DocPath, fields: Fields, mode: SetMode) -> hearth_core::Result<()> {
    self
      .run_transaction(move |tx| tx.set(&path, fields.clone(), mode))
      .await
  }

  async fn delete(&self, path: DocPath) -> hearth_core::Result<bool> {
    self.run_transaction(move |tx| tx.delete(&path)).await
  }

  async fn add(&self, collection: CollectionPath, fields: Fields) -> hearth_core::Result<DocPath> {
    let path = collection.doc(&Uuid::new_v4().to_string())?;
    let target = path.clone();
    self
      .run_transaction(move |tx| tx.set(&target, fields.clone(), SetMode::Overwrite))
      .await?;
    Ok(path)
  }

  async fn query(
    &self,
    collection: CollectionPath,
    field: String,
    equals: Value,
    limit: usize,
  ) -> hearth_core::Result<Vec<Document>> {
    Ok(
      self
        .with_conn(move |conn| select_where(conn, &collection, &field, &equals, limit))
        .await?,
    )
  }

  async fn list(&self, collection: CollectionPath) -> hearth_core::Result<Vec<Document>> {
    Ok(self.with_conn(move |conn| select_all(conn, &collection)).await?)
  }

  async fn run_transaction<T, F>(&self, mut body: F) -> hearth_core::Result<T>
  where
    T: Send + 'static,
    F: FnMut(&mut dyn Transaction) -> hearth_core::Result<T> + Send + 'static,
  {
    let cancelled = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(Arc::clone(&cancelled));

    let mut attempt: u32 = 0;
    loop {
      attempt += 1;

      let flag = Arc::clone(&cancelled);
      let (returned, outcome) = self
        .conn
        .call(move |conn| {
          let outcome = attempt_once(conn, &mut body, &flag);
          Ok((body, outcome))
        })
        .await
        .map_err(Error::from)?;
      body = returned;

      match outcome {
        Err(hearth_core::Error::Conflict) if attempt < self.max_attempts => {
          warn!(attempt, max_attempts = self.max_attempts, "transaction conflict, retrying");
          tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }
        Err(hearth_core::Error::Conflict) => {
          warn!(attempts = attempt, "transaction aborted after repeated conflicts");
          return Err(hearth_core::Error::TransactionAborted { attempts: attempt });
        }
        other => return other,
      }
    }
  }
}
