//! The `DocumentStore` trait and the transaction handle it lends out.
//!
//! The trait is implemented by storage backends (e.g. `hearth-store-sqlite`).
//! Everything above it (the invitation components, the HTTP layer) depends on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use serde_json::Value;

use crate::{
  Result,
  document::{Document, Fields, SetMode},
  path::{CollectionPath, DocPath},
};

// ─── Transaction handle ──────────────────────────────────────────────────────

/// Reads and writes scoped to one atomic transaction.
///
/// A transaction body must not have effects outside this handle: the store
/// may run it several times before one attempt commits. Bodies should perform
/// all reads before their first write.
///
/// Backends report write conflicts as [`crate::Error::Conflict`]; a body
/// should let that error propagate so the store can retry.
pub trait Transaction {
  fn get(&mut self, path: &DocPath) -> Result<Option<Document>>;

  /// Documents in `collection` whose `field` equals `equals`, up to `limit`.
  fn query(
    &mut self,
    collection: &CollectionPath,
    field: &str,
    equals: &Value,
    limit: usize,
  ) -> Result<Vec<Document>>;

  fn set(&mut self, path: &DocPath, fields: Fields, mode: SetMode) -> Result<()>;

  /// Delete a document. Returns whether it existed; a missing document is not
  /// an error.
  fn delete(&mut self, path: &DocPath) -> Result<bool>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a transactional document database.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  // ── Single-document operations ────────────────────────────────────────

  /// Read one document. Returns `None` if it does not exist.
  fn get(
    &self,
    path: DocPath,
  ) -> impl Future<Output = Result<Option<Document>>> + Send + '_;

  /// Write one document. Timestamp sentinels in `fields` take the store's
  /// clock.
  fn set(
    &self,
    path: DocPath,
    fields: Fields,
    mode: SetMode,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Delete one document, returning whether it existed.
  fn delete(&self, path: DocPath) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Create a document with a store-assigned id inside `collection`.
  fn add(
    &self,
    collection: CollectionPath,
    fields: Fields,
  ) -> impl Future<Output = Result<DocPath>> + Send + '_;

  // ── Collection reads ──────────────────────────────────────────────────

  /// Documents in `collection` whose top-level `field` equals `equals`.
  fn query(
    &self,
    collection: CollectionPath,
    field: String,
    equals: Value,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Document>>> + Send + '_;

  /// Every document in `collection`, oldest first.
  fn list(
    &self,
    collection: CollectionPath,
  ) -> impl Future<Output = Result<Vec<Document>>> + Send + '_;

  // ── Transactions ──────────────────────────────────────────────────────

  /// Run `body` atomically. Either every write the body made commits, or
  /// none does.
  ///
  /// When an attempt fails with [`crate::Error::Conflict`] the store rolls it
  /// back and runs `body` again, up to a backend-defined number of attempts,
  /// after which it returns [`crate::Error::TransactionAborted`]. Any other
  /// error from `body` rolls back and is returned unchanged.
  fn run_transaction<T, F>(&self, body: F) -> impl Future<Output = Result<T>> + Send + '_
  where
    T: Send + 'static,
    F: FnMut(&mut dyn Transaction) -> Result<T> + Send + 'static;
}
