//! User profiles: display-name lookup for memberships, and profile upkeep.

use tracing::{info, warn};

use crate::{
  Error, Result,
  document::{Fields, Keyed, SetMode},
  model::UserProfile,
  path,
  store::{DocumentStore, Transaction},
};

/// Role written on first profile creation.
pub const DEFAULT_ROLE: &str = "user";

/// Look up the display name for `user_id` through a transaction handle.
///
/// Returns `Ok(None)` when the profile is missing, has no usable `user_name`,
/// or cannot be read. Only a write conflict is propagated, so the enclosing
/// transaction can retry.
pub fn display_name(tx: &mut dyn Transaction, user_id: &str) -> Result<Option<String>> {
  let doc = match path::user(user_id).and_then(|p| tx.get(&p)) {
    Ok(doc) => doc,
    Err(Error::Conflict) => return Err(Error::Conflict),
    Err(e) => {
      warn!(user_id, error = %e, "profile read failed; using user id as name");
      return Ok(None);
    }
  };

  let name = doc
    .and_then(|d| d.decode::<UserProfile>().ok())
    .and_then(|p| p.user_name)
    .filter(|n| !n.is_empty());
  Ok(name)
}

/// [`display_name`], falling back to the raw user id.
pub fn display_name_or_id(tx: &mut dyn Transaction, user_id: &str) -> Result<String> {
  Ok(display_name(tx, user_id)?.unwrap_or_else(|| user_id.to_owned()))
}

/// Read `users/{user_id}`.
pub async fn get_profile<S: DocumentStore>(
  store: &S,
  user_id: &str,
) -> Result<Option<Keyed<UserProfile>>> {
  store
    .get(path::user(user_id)?)
    .await?
    .map(|d| d.decode_keyed())
    .transpose()
}

/// Create or update `users/{user_id}`.
///
/// `uid`, `role` and `created_at` are written once, on creation; later calls
/// only touch the fields that are `Some`.
pub async fn upsert_profile<S: DocumentStore>(
  store: &S,
  user_id: &str,
  email: Option<String>,
  user_name: Option<String>,
) -> Result<()> {
  let target = path::user(user_id)?;
  let uid = user_id.to_owned();

  store
    .run_transaction(move |tx| {
      let mut fields = Fields::new();
      if tx.get(&target)?.is_none() {
        fields = fields
          .with("uid", uid.as_str())
          .with("role", DEFAULT_ROLE)
          .with_server_timestamp("created_at");
      }
      if let Some(email) = &email {
        fields = fields.with("email", email.as_str());
      }
      if let Some(name) = &user_name {
        fields = fields.with("user_name", name.as_str());
      }
      if !fields.is_empty() {
        tx.set(&target, fields, SetMode::Merge)?;
      }
      Ok(())
    })
    .await?;

  info!(user_id, "profile saved");
  Ok(())
}

/// Delete `users/{user_id}`. Returns whether a profile existed.
pub async fn delete_profile<S: DocumentStore>(store: &S, user_id: &str) -> Result<bool> {
  let existed = store.delete(path::user(user_id)?).await?;
  info!(user_id, existed, "profile deleted");
  Ok(existed)
}
