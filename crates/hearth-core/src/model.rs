//! Typed records for every document kind in the store.
//!
//! Each field uses [`lenient`] decoding: a record read from the store never
//! fails because one field is missing or has the wrong type. Callers decide
//! what an unset field means.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::document::lenient;

/// `groups/{group_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
  #[serde(default, deserialize_with = "lenient")]
  pub group_id:   Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub created_by: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub created_at: Option<DateTime<Utc>>,
}

/// The only state an invitation record is ever written with. Resolution
/// deletes the record rather than moving it to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
  Pending,
}

impl InviteStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
    }
  }
}

/// `users/{invitee}/group_invites/{group_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
  #[serde(default, deserialize_with = "lenient")]
  pub group_id:  Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub status:    Option<InviteStatus>,
  #[serde(default, deserialize_with = "lenient")]
  pub sent_at:   Option<DateTime<Utc>>,
  /// The inviter's user id.
  #[serde(default, deserialize_with = "lenient")]
  pub sent_from: Option<String>,
}

/// `groups/{group_id}/members/{user_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Membership {
  #[serde(default, deserialize_with = "lenient")]
  pub user_id:   Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub user_name: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub joined_at: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "lenient")]
  pub added_by:  Option<String>,
}

/// `users/{user_id}/my_groups/{group_id}` — the per-user inverse index of
/// [`Membership`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyGroup {
  /// Reference of the form `/groups/{group_id}`.
  #[serde(default, deserialize_with = "lenient")]
  pub group_id:  Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub timestamp: Option<DateTime<Utc>>,
}

/// `users/{user_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(default, deserialize_with = "lenient")]
  pub uid:        Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub email:      Option<String>,
  /// Display name copied into memberships.
  #[serde(default, deserialize_with = "lenient")]
  pub user_name:  Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub role:       Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoreFrequency {
  Daily,
  Weekly,
  Monthly,
}

/// `groups/{group_id}/chores/{chore_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chore {
  #[serde(default, deserialize_with = "lenient")]
  pub group_id:        Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub chore_name:      Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub chore_details:   Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub chore_due_date:  Option<NaiveDate>,
  #[serde(default, deserialize_with = "lenient")]
  pub chore_frequency: Option<ChoreFrequency>,
  #[serde(default, deserialize_with = "lenient")]
  pub chore_assignee:  Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub created_by:      Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub created_at:      Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn mistyped_fields_decode_as_unset() {
    let profile: UserProfile = serde_json::from_value(json!({
      "uid": "u1",
      "user_name": 42,
      "created_at": "not a timestamp",
    }))
    .unwrap();

    assert_eq!(profile.uid.as_deref(), Some("u1"));
    assert_eq!(profile.user_name, None);
    assert_eq!(profile.created_at, None);
    assert_eq!(profile.email, None);
  }

  #[test]
  fn unknown_enum_values_decode_as_unset() {
    let chore: Chore = serde_json::from_value(json!({
      "chore_name": "Dishes",
      "chore_frequency": "hourly",
      "chore_due_date": "2024-06-01",
    }))
    .unwrap();

    assert_eq!(chore.chore_frequency, None);
    assert_eq!(chore.chore_due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
  }

  #[test]
  fn invitation_status_round_trips_as_lowercase() {
    let invite: Invitation =
      serde_json::from_value(json!({ "status": "pending" })).unwrap();
    assert_eq!(invite.status, Some(InviteStatus::Pending));
    assert_eq!(InviteStatus::Pending.as_str(), "pending");
  }
}
