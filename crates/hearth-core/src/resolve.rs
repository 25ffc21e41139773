//! Invitation Resolution Engine: turns an invitee's decision into membership
//! state.
//!
//! Accepting touches three documents (the invitation, the membership and the
//! invitee's `my_groups` mirror) and must leave them consistent even when the
//! same request arrives more than once, whether from a client retry, a
//! duplicated network request, or the store re-running the transaction body
//! after a conflict. Every branch therefore converges on the same end state:
//! exactly one membership, no invitation, and a mirror entry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
  Error, Result,
  document::{Fields, SetMode},
  path::{self, DocPath},
  profile,
  store::{DocumentStore, Transaction},
};

/// What a resolve call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
  /// The invitation is gone (or never existed).
  Declined,
  /// A new membership was created by this call.
  AcceptedNew,
  /// The user was already a member; at most the leftovers were cleaned up.
  AcceptedAlreadyMember,
}

impl Resolution {
  pub fn is_accepted(self) -> bool { !matches!(self, Self::Declined) }
}

/// Resolves pending invitations.
pub struct InvitationResolver<S> {
  store: Arc<S>,
}

impl<S> Clone for InvitationResolver<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: DocumentStore> InvitationResolver<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Apply `user_id`'s decision on their invitation to `group_id`.
  ///
  /// Declining deletes the invitation and succeeds even if there was none.
  /// Accepting runs as one transaction; see [`accept_in`] for the branches.
  pub async fn resolve(&self, user_id: &str, group_id: &str, accepted: bool) -> Result<Resolution> {
    path::segment(user_id, "user_id")?;
    path::segment(group_id, "group_id")?;

    let outcome = if accepted {
      self.accept(user_id, group_id).await?
    } else {
      self.decline(user_id, group_id).await?
    };

    info!(user_id, group_id, ?outcome, "invite resolved");
    Ok(outcome)
  }

  async fn decline(&self, user_id: &str, group_id: &str) -> Result<Resolution> {
    let existed = self.store.delete(path::group_invite(user_id, group_id)?).await?;
    if !existed {
      debug!(user_id, group_id, "decline with no pending invite");
    }
    Ok(Resolution::Declined)
  }

  async fn accept(&self, user_id: &str, group_id: &str) -> Result<Resolution> {
    let keys = AcceptKeys::new(user_id, group_id)?;
    self.store.run_transaction(move |tx| accept_in(tx, &keys)).await
  }
}

// ─── Accept transaction ──────────────────────────────────────────────────────

/// Everything the accept transaction addresses, computed once up front.
struct AcceptKeys {
  user_id:  String,
  group_id: String,
  invite:   DocPath,
  member:   DocPath,
  mirror:   DocPath,
}

impl AcceptKeys {
  fn new(user_id: &str, group_id: &str) -> Result<Self> {
    Ok(Self {
      user_id:  user_id.to_owned(),
      group_id: group_id.to_owned(),
      invite:   path::group_invite(user_id, group_id)?,
      member:   path::member(group_id, user_id)?,
      mirror:   path::my_group(user_id, group_id)?,
    })
  }
}

/// Mirror fields, merged so unrelated fields on an existing entry survive.
fn mirror_fields(group_id: &str) -> Fields {
  Fields::new()
    .with("group_id", path::group_ref(group_id))
    .with_server_timestamp("timestamp")
}

/// The accept transaction body. Safe to run any number of times.
///
/// 1. No invitation: already a member means an earlier attempt finished, so
///    report [`Resolution::AcceptedAlreadyMember`] without writing. Otherwise
///    the invite genuinely does not exist.
/// 2. Resolve the display name, falling back to the user id.
/// 3. Membership already present: an earlier attempt got partway. Drop the
///    leftover invitation and make sure the mirror exists.
/// 4. Otherwise create the membership, drop the invitation, upsert the mirror.
fn accept_in(tx: &mut dyn Transaction, keys: &AcceptKeys) -> Result<Resolution> {
  if tx.get(&keys.invite)?.is_none() {
    if tx.get(&keys.member)?.is_some() {
      debug!(user_id = %keys.user_id, group_id = %keys.group_id, "invite already consumed");
      return Ok(Resolution::AcceptedAlreadyMember);
    }
    return Err(Error::InviteNotFound {
      group_id: keys.group_id.clone(),
      user_id:  keys.user_id.clone(),
    });
  }

  let user_name = profile::display_name_or_id(tx, &keys.user_id)?;

  if tx.get(&keys.member)?.is_some() {
    debug!(user_id = %keys.user_id, group_id = %keys.group_id, "repairing partial accept");
    tx.delete(&keys.invite)?;
    tx.set(&keys.mirror, mirror_fields(&keys.group_id), SetMode::Merge)?;
    return Ok(Resolution::AcceptedAlreadyMember);
  }

  tx.set(
    &keys.member,
    Fields::new()
      .with("user_id", keys.user_id.as_str())
      .with("user_name", user_name)
      .with_server_timestamp("joined_at")
      .with("added_by", keys.user_id.as_str()),
    SetMode::Merge,
  )?;
  tx.delete(&keys.invite)?;
  tx.set(&keys.mirror, mirror_fields(&keys.group_id), SetMode::Merge)?;

  Ok(Resolution::AcceptedNew)
}
