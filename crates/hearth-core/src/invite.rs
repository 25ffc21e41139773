//! Invitation Writer: records an open offer for a user to join a group.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::{
  Error, Result,
  document::{Fields, SetMode},
  model::InviteStatus,
  path,
  store::DocumentStore,
};

/// Creates pending invitations.
///
/// The membership check and the invitation write share one transaction, so
/// an accept that commits concurrently cannot leave an invitation behind for
/// a user who is already a member.
pub struct InvitationWriter<S> {
  store: Arc<S>,
}

impl<S> Clone for InvitationWriter<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: DocumentStore> InvitationWriter<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Invite `invitee` to `group_id` on behalf of `inviter`.
  ///
  /// Fails with [`Error::AlreadyMember`] if the invitee already has a
  /// membership record in the group. Re-inviting a user who already has a
  /// pending invitation overwrites it with a fresh `sent_at`.
  pub async fn invite(&self, group_id: &str, inviter: &str, invitee: &str) -> Result<()> {
    path::segment(group_id, "group_id")?;
    path::segment(invitee, "invitee")?;
    path::segment(inviter, "user_id")?;
    let invite = path::group_invite(invitee, group_id)?;
    let members = path::members(group_id)?;

    let group = group_id.to_owned();
    let from = inviter.to_owned();
    let who = invitee.to_owned();

    self
      .store
      .run_transaction(move |tx| {
        let existing = tx.query(&members, "user_id", &Value::from(who.as_str()), 1)?;
        if !existing.is_empty() {
          return Err(Error::AlreadyMember {
            group_id: group.clone(),
            user_id:  who.clone(),
          });
        }

        tx.set(
          &invite,
          Fields::new()
            .with("group_id", group.as_str())
            .with("status", InviteStatus::Pending.as_str())
            .with_server_timestamp("sent_at")
            .with("sent_from", from.as_str()),
          SetMode::Overwrite,
        )
      })
      .await?;

    info!(group_id, inviter, invitee, "invite sent");
    Ok(())
  }
}
