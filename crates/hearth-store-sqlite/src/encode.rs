//! Encoding and decoding helpers between core document types and the plain
//! text stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Document fields are a compact JSON object.

use chrono::{DateTime, Utc};
use hearth_core::{
  document::{Document, encode_timestamp},
  path::CollectionPath,
};
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { encode_timestamp(dt) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Query operands ──────────────────────────────────────────────────────────

/// The SQL value that `json_extract` yields for a JSON scalar, so equality
/// can be tested in SQL. Only strings, numbers and booleans are comparable.
pub fn encode_operand(v: &Value) -> Result<SqlValue> {
  match v {
    Value::String(s) => Ok(SqlValue::Text(s.clone())),
    Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
    Value::Number(n) => n
      .as_i64()
      .map(SqlValue::Integer)
      .or_else(|| n.as_f64().map(SqlValue::Real))
      .ok_or_else(|| Error::UnsupportedOperand(v.clone())),
    other => Err(Error::UnsupportedOperand(other.clone())),
  }
}

/// JSON path addressing a top-level field. Field names are restricted to
/// identifier characters so the path never reaches into nested values.
pub fn field_path(field: &str) -> Result<String> {
  let ok = !field.is_empty()
    && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
  if !ok {
    return Err(Error::Core(hearth_core::Error::Validation(format!(
      "invalid field name: {field:?}"
    ))));
  }
  Ok(format!("$.{field}"))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawDocument`]'s field order.
pub const DOCUMENT_COLUMNS: &str = "collection, doc_id, fields, create_time, update_time";

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub collection:  String,
  pub doc_id:      String,
  pub fields:      String,
  pub create_time: String,
  pub update_time: String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      collection:  row.get(0)?,
      doc_id:      row.get(1)?,
      fields:      row.get(2)?,
      create_time: row.get(3)?,
      update_time: row.get(4)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    let path = CollectionPath::parse(&self.collection)?.doc(&self.doc_id)?;
    let fields = match serde_json::from_str(&self.fields)? {
      Value::Object(map) => map,
      _ => return Err(Error::NotAnObject(path.to_string())),
    };
    Ok(Document {
      path,
      fields,
      create_time: decode_dt(&self.create_time)?,
      update_time: decode_dt(&self.update_time)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn operands_match_json_extract_types() {
    assert_eq!(encode_operand(&json!("u2")).unwrap(), SqlValue::Text("u2".into()));
    assert_eq!(encode_operand(&json!(true)).unwrap(), SqlValue::Integer(1));
    assert_eq!(encode_operand(&json!(3)).unwrap(), SqlValue::Integer(3));
    assert!(encode_operand(&json!(null)).is_err());
    assert!(encode_operand(&json!(["a"])).is_err());
  }

  #[test]
  fn field_paths_reject_injection() {
    assert_eq!(field_path("user_id").unwrap(), "$.user_id");
    assert!(field_path("a') OR 1=1 --").is_err());
    assert!(field_path("").is_err());
  }

  #[test]
  fn raw_document_rejects_non_objects() {
    let raw = RawDocument {
      collection:  "users".into(),
      doc_id:      "u1".into(),
      fields:      "[1,2]".into(),
      create_time: "2024-01-01T00:00:00Z".into(),
      update_time: "2024-01-01T00:00:00Z".into(),
    };
    assert!(matches!(raw.into_document(), Err(Error::NotAnObject(_))));
  }
}
