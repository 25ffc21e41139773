//! Document addressing.
//!
//! Every record lives at a `/`-separated path whose segments alternate between
//! collection names and document ids, e.g. `groups/g1/members/u2`. Ids come
//! from callers, so every segment is validated before it reaches a store.

use std::fmt;

use crate::{Error, Result};

// ─── Segments ────────────────────────────────────────────────────────────────

/// Validate a single caller-supplied path segment. `field` names the input in
/// the error message.
pub fn segment<'a>(value: &'a str, field: &str) -> Result<&'a str> {
  if value.is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  if value.contains('/') || value == "." || value == ".." {
    return Err(Error::Validation(format!(
      "{field} is not a valid identifier: {value:?}"
    )));
  }
  Ok(value)
}

// ─── CollectionPath ──────────────────────────────────────────────────────────

/// Path to a collection: an odd number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
  /// A top-level collection such as `users`.
  pub fn root(name: &str) -> Result<Self> {
    Ok(Self(segment(name, "collection")?.to_owned()))
  }

  /// Parse a stored collection path, validating every segment.
  pub fn parse(raw: &str) -> Result<Self> {
    let segments: Vec<&str> = raw.split('/').collect();
    if segments.len() % 2 == 0 {
      return Err(Error::Validation(format!(
        "not a collection path: {raw:?}"
      )));
    }
    for s in &segments {
      segment(s, "path segment")?;
    }
    Ok(Self(raw.to_owned()))
  }

  /// The document with `id` inside this collection.
  pub fn doc(&self, id: &str) -> Result<DocPath> {
    Ok(DocPath {
      collection: self.clone(),
      id:         segment(id, "document id")?.to_owned(),
    })
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CollectionPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── DocPath ─────────────────────────────────────────────────────────────────

/// Path to a single document: its collection plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
  collection: CollectionPath,
  id:         String,
}

impl DocPath {
  pub fn collection(&self) -> &CollectionPath { &self.collection }

  pub fn id(&self) -> &str { &self.id }

  /// A sub-collection nested under this document.
  pub fn child(&self, name: &str) -> Result<CollectionPath> {
    let name = segment(name, "collection")?;
    Ok(CollectionPath(format!("{self}/{name}")))
  }
}

impl fmt::Display for DocPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.collection, self.id)
  }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

pub const GROUPS: &str = "groups";
pub const USERS: &str = "users";
pub const MEMBERS: &str = "members";
pub const CHORES: &str = "chores";
pub const GROUP_INVITES: &str = "group_invites";
pub const MY_GROUPS: &str = "my_groups";

fn in_field(field: &'static str) -> impl Fn(Error) -> Error {
  move |e| match e {
    Error::Validation(m) => {
      Error::Validation(m.replacen("document id", field, 1))
    }
    other => other,
  }
}

/// `groups/{group_id}`
pub fn group(group_id: &str) -> Result<DocPath> {
  CollectionPath::root(GROUPS)?
    .doc(group_id)
    .map_err(in_field("group_id"))
}

/// `users/{user_id}`
pub fn user(user_id: &str) -> Result<DocPath> {
  CollectionPath::root(USERS)?
    .doc(user_id)
    .map_err(in_field("user_id"))
}

/// `groups/{group_id}/members`
pub fn members(group_id: &str) -> Result<CollectionPath> {
  group(group_id)?.child(MEMBERS)
}

/// `groups/{group_id}/members/{user_id}`
pub fn member(group_id: &str, user_id: &str) -> Result<DocPath> {
  members(group_id)?.doc(user_id).map_err(in_field("user_id"))
}

/// `groups/{group_id}/chores`
pub fn chores(group_id: &str) -> Result<CollectionPath> {
  group(group_id)?.child(CHORES)
}

/// `users/{user_id}/group_invites`
pub fn group_invites(user_id: &str) -> Result<CollectionPath> {
  user(user_id)?.child(GROUP_INVITES)
}

/// `users/{user_id}/group_invites/{group_id}`
pub fn group_invite(user_id: &str, group_id: &str) -> Result<DocPath> {
  group_invites(user_id)?
    .doc(group_id)
    .map_err(in_field("group_id"))
}

/// `users/{user_id}/my_groups`
pub fn my_groups(user_id: &str) -> Result<CollectionPath> {
  user(user_id)?.child(MY_GROUPS)
}

/// `users/{user_id}/my_groups/{group_id}`
pub fn my_group(user_id: &str, group_id: &str) -> Result<DocPath> {
  my_groups(user_id)?.doc(group_id).map_err(in_field("group_id"))
}

/// The value stored in a mirror's `group_id` field: `/groups/{group_id}`.
pub fn group_ref(group_id: &str) -> String { format!("/{GROUPS}/{group_id}") }
