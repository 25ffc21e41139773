//! Group creation and the per-user group and invitation listings.

use tracing::info;
use uuid::Uuid;

use crate::{
  Result,
  document::{Fields, Keyed, SetMode},
  model::{Invitation, MyGroup},
  path, profile,
  store::DocumentStore,
};

/// Create a group owned by `creator` and return its id.
///
/// The creator is seeded as the first member, with the matching `my_groups`
/// mirror, in the same transaction that writes the group document.
pub async fn create_group<S: DocumentStore>(store: &S, creator: &str) -> Result<String> {
  path::segment(creator, "user_id")?;

  let group_id = Uuid::new_v4().to_string();
  let group_doc = path::group(&group_id)?;
  let member = path::member(&group_id, creator)?;
  let mirror = path::my_group(creator, &group_id)?;

  let gid = group_id.clone();
  let uid = creator.to_owned();
  store
    .run_transaction(move |tx| {
      let user_name = profile::display_name_or_id(tx, &uid)?;

      tx.set(
        &group_doc,
        Fields::new()
          .with("group_id", gid.as_str())
          .with("created_by", uid.as_str())
          .with_server_timestamp("created_at"),
        SetMode::Overwrite,
      )?;
      tx.set(
        &member,
        Fields::new()
          .with("user_id", uid.as_str())
          .with("user_name", user_name)
          .with_server_timestamp("joined_at")
          .with("added_by", uid.as_str()),
        SetMode::Merge,
      )?;
      tx.set(
        &mirror,
        Fields::new()
          .with("group_id", path::group_ref(&gid))
          .with_server_timestamp("timestamp"),
        SetMode::Merge,
      )
    })
    .await?;

  info!(%group_id, creator, "group created");
  Ok(group_id)
}

/// The groups `user_id` belongs to, read from their `my_groups` mirror.
pub async fn my_groups<S: DocumentStore>(store: &S, user_id: &str) -> Result<Vec<Keyed<MyGroup>>> {
  store
    .list(path::my_groups(user_id)?)
    .await?
    .iter()
    .map(|d| d.decode_keyed())
    .collect()
}

/// Invitations waiting for `user_id` to accept or decline.
pub async fn pending_invites<S: DocumentStore>(
  store: &S,
  user_id: &str,
) -> Result<Vec<Keyed<Invitation>>> {
  store
    .list(path::group_invites(user_id)?)
    .await?
    .iter()
    .map(|d| d.decode_keyed())
    .collect()
}
