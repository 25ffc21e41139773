//! Chores attached to a group.

use chrono::NaiveDate;
use tracing::info;

use crate::{
  Error, Result,
  document::{Fields, Keyed},
  model::{Chore, ChoreFrequency},
  path,
  store::DocumentStore,
};

/// Input to [`add_chore`]. `created_at` is always set by the store.
#[derive(Debug, Clone)]
pub struct NewChore {
  pub group_id:        String,
  pub created_by:      String,
  pub chore_name:      String,
  pub chore_details:   Option<String>,
  pub chore_due_date:  NaiveDate,
  pub chore_frequency: ChoreFrequency,
  pub chore_assignee:  Option<String>,
}

/// Store a chore under its group and return the assigned chore id.
pub async fn add_chore<S: DocumentStore>(store: &S, input: NewChore) -> Result<String> {
  path::segment(&input.created_by, "user_id")?;
  if input.chore_name.trim().is_empty() {
    return Err(Error::Validation("chore_name is required".into()));
  }
  let collection = path::chores(&input.group_id)?;

  let fields = Fields::new()
    .with("group_id", input.group_id.as_str())
    .with("chore_name", input.chore_name)
    .with("chore_details", input.chore_details)
    .with("chore_due_date", input.chore_due_date.to_string())
    .with("chore_frequency", serde_json::to_value(input.chore_frequency)?)
    .with("chore_assignee", input.chore_assignee)
    .with("created_by", input.created_by.as_str())
    .with_server_timestamp("created_at");

  let doc = store.add(collection, fields).await?;
  info!(group_id = %input.group_id, chore_id = doc.id(), "chore added");
  Ok(doc.id().to_owned())
}

/// All chores in `group_id`, oldest first.
pub async fn list_chores<S: DocumentStore>(store: &S, group_id: &str) -> Result<Vec<Keyed<Chore>>> {
  store
    .list(path::chores(group_id)?)
    .await?
    .iter()
    .map(|d| d.decode_keyed())
    .collect()
}
