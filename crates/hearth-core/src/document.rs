//! Documents as stored, and field sets as written.
//!
//! A stored [`Document`] is a JSON object plus store metadata. Writes go
//! through [`Fields`], which may contain [`FieldValue::ServerTimestamp`]
//! sentinels that the store replaces with its own clock at write time.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Result, path::DocPath};

// ─── Writes ──────────────────────────────────────────────────────────────────

/// A single value in a write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Value(Value),
  /// Replaced by the store's current time when the write is applied.
  ServerTimestamp,
}

/// How a write combines with an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
  /// Replace every field of the document.
  Overwrite,
  /// Set the given fields, leaving all other existing fields untouched.
  Merge,
}

/// An ordered set of fields to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.0.insert(key.to_owned(), FieldValue::Value(value.into()));
    self
  }

  pub fn with_server_timestamp(mut self, key: &str) -> Self {
    self.0.insert(key.to_owned(), FieldValue::ServerTimestamp);
    self
  }

  pub fn get(&self, key: &str) -> Option<&FieldValue> { self.0.get(key) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Replace timestamp sentinels with `now` and produce the JSON object that
  /// gets stored.
  pub fn resolve(&self, now: DateTime<Utc>) -> Map<String, Value> {
    self
      .0
      .iter()
      .map(|(k, v)| {
        let value = match v {
          FieldValue::Value(v) => v.clone(),
          FieldValue::ServerTimestamp => Value::String(encode_timestamp(now)),
        };
        (k.clone(), value)
      })
      .collect()
  }
}

/// Timestamps are stored as RFC 3339 strings in UTC.
pub fn encode_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// A document as read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub path:        DocPath,
  pub fields:      Map<String, Value>,
  pub create_time: DateTime<Utc>,
  pub update_time: DateTime<Utc>,
}

impl Document {
  /// Decode into a typed record. Records in [`crate::model`] mark every field
  /// with [`lenient`], so absent or mistyped fields come back as `None`.
  pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
  }

  /// Decode and pair with the document id.
  pub fn decode_keyed<T: DeserializeOwned>(&self) -> Result<Keyed<T>> {
    Ok(Keyed {
      id:     self.path.id().to_owned(),
      record: self.decode()?,
    })
  }
}

/// A decoded record together with the id of the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyed<T> {
  pub id:     String,
  #[serde(flatten)]
  pub record: T,
}

/// Field deserializer that fails closed: anything that does not decode as `T`
/// becomes `None` instead of an error or a default value.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let raw = Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(raw).ok())
}
