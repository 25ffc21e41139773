//! Integration tests for `SqliteStore` against an in-memory database.

use std::{
  sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
  },
  time::Duration,
};

use chrono::NaiveDate;
use hearth_core::{
  Error, InvitationResolver, InvitationWriter, Resolution,
  chore::{self, NewChore},
  document::{Fields, SetMode},
  group,
  model::{ChoreFrequency, Invitation, InviteStatus, Membership, MyGroup},
  path, profile,
  store::DocumentStore,
};
use serde_json::{Value, json};

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

fn writer(s: &Arc<SqliteStore>) -> InvitationWriter<SqliteStore> {
  InvitationWriter::new(Arc::clone(s))
}

fn resolver(s: &Arc<SqliteStore>) -> InvitationResolver<SqliteStore> {
  InvitationResolver::new(Arc::clone(s))
}

async fn membership(s: &SqliteStore, group_id: &str, user_id: &str) -> Option<Membership> {
  s.get(path::member(group_id, user_id).unwrap())
    .await
    .unwrap()
    .map(|d| d.decode().unwrap())
}

async fn invitation(s: &SqliteStore, user_id: &str, group_id: &str) -> Option<Invitation> {
  s.get(path::group_invite(user_id, group_id).unwrap())
    .await
    .unwrap()
    .map(|d| d.decode().unwrap())
}

async fn mirror(s: &SqliteStore, user_id: &str, group_id: &str) -> Option<MyGroup> {
  s.get(path::my_group(user_id, group_id).unwrap())
    .await
    .unwrap()
    .map(|d| d.decode().unwrap())
}

async fn member_count(s: &SqliteStore, group_id: &str) -> usize {
  s.list(path::members(group_id).unwrap()).await.unwrap().len()
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let doc = s.get(path::user("nobody").unwrap()).await.unwrap();
  assert!(doc.is_none());
}

#[tokio::test]
async fn set_and_get_round_trips_fields() {
  let s = store().await;
  let p = path::user("u1").unwrap();
  s.set(
    p.clone(),
    Fields::new().with("email", "a@example.com").with("n", 3),
    SetMode::Overwrite,
  )
  .await
  .unwrap();

  let doc = s.get(p.clone()).await.unwrap().unwrap();
  assert_eq!(doc.path, p);
  assert_eq!(doc.fields["email"], json!("a@example.com"));
  assert_eq!(doc.fields["n"], json!(3));
  assert_eq!(doc.create_time, doc.update_time);
}

#[tokio::test]
async fn merge_preserves_unrelated_fields() {
  let s = store().await;
  let p = path::my_group("u1", "g1").unwrap();
  s.set(
    p.clone(),
    Fields::new().with("pinned", true).with("group_id", "/groups/old"),
    SetMode::Overwrite,
  )
  .await
  .unwrap();

  s.set(p.clone(), Fields::new().with("group_id", "/groups/g1"), SetMode::Merge)
    .await
    .unwrap();

  let doc = s.get(p).await.unwrap().unwrap();
  assert_eq!(doc.fields["pinned"], json!(true));
  assert_eq!(doc.fields["group_id"], json!("/groups/g1"));
}

#[tokio::test]
async fn overwrite_drops_unrelated_fields() {
  let s = store().await;
  let p = path::user("u1").unwrap();
  s.set(p.clone(), Fields::new().with("a", 1).with("b", 2), SetMode::Overwrite)
    .await
    .unwrap();
  s.set(p.clone(), Fields::new().with("a", 9), SetMode::Overwrite)
    .await
    .unwrap();

  let doc = s.get(p).await.unwrap().unwrap();
  assert_eq!(doc.fields.len(), 1);
  assert_eq!(doc.fields["a"], json!(9));
}

#[tokio::test]
async fn server_timestamps_are_filled_in() {
  let s = store().await;
  let p = path::user("u1").unwrap();
  s.set(p.clone(), Fields::new().with_server_timestamp("created_at"), SetMode::Overwrite)
    .await
    .unwrap();

  let doc = s.get(p).await.unwrap().unwrap();
  let stamp = doc.fields["created_at"].as_str().unwrap();
  assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[tokio::test]
async fn delete_reports_whether_document_existed() {
  let s = store().await;
  let p = path::user("u1").unwrap();
  s.set(p.clone(), Fields::new().with("a", 1), SetMode::Overwrite)
    .await
    .unwrap();

  assert!(s.delete(p.clone()).await.unwrap());
  assert!(!s.delete(p.clone()).await.unwrap());
  assert!(s.get(p).await.unwrap().is_none());
}

#[tokio::test]
async fn add_assigns_distinct_ids() {
  let s = store().await;
  let col = path::chores("g1").unwrap();
  let a = s.add(col.clone(), Fields::new().with("n", 1)).await.unwrap();
  let b = s.add(col.clone(), Fields::new().with("n", 2)).await.unwrap();

  assert_ne!(a.id(), b.id());
  assert_eq!(a.collection(), &col);
  assert_eq!(s.list(col).await.unwrap().len(), 2);
}

#[tokio::test]
async fn query_matches_on_field_equality() {
  let s = store().await;
  let col = path::members("g1").unwrap();
  for uid in ["u1", "u2", "u3"] {
    s.set(col.doc(uid).unwrap(), Fields::new().with("user_id", uid), SetMode::Overwrite)
      .await
      .unwrap();
  }

  let hits = s
    .query(col.clone(), "user_id".into(), Value::from("u2"), 10)
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].path.id(), "u2");

  let none = s
    .query(col, "user_id".into(), Value::from("u9"), 10)
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn query_respects_limit_and_collection() {
  let s = store().await;
  for g in ["g1", "g2"] {
    for uid in ["a", "b"] {
      s.set(
        path::member(g, uid).unwrap(),
        Fields::new().with("active", true),
        SetMode::Overwrite,
      )
      .await
      .unwrap();
    }
  }

  let hits = s
    .query(path::members("g1").unwrap(), "active".into(), Value::Bool(true), 1)
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].path.collection().as_str(), "groups/g1/members");
}

#[tokio::test]
async fn query_rejects_unsupported_field_and_operand() {
  let s = store().await;
  let col = path::members("g1").unwrap();
  let bad_field = s.query(col.clone(), "a.b".into(), Value::from("x"), 1).await;
  assert!(matches!(bad_field, Err(Error::Validation(_))));

  let bad_operand = s.query(col, "user_id".into(), Value::Null, 1).await;
  assert!(matches!(bad_operand, Err(Error::Store(_))));
}

#[tokio::test]
async fn list_is_scoped_to_one_collection() {
  let s = store().await;
  s.set(path::my_group("u1", "g1").unwrap(), Fields::new(), SetMode::Overwrite)
    .await
    .unwrap();
  s.set(path::my_group("u2", "g1").unwrap(), Fields::new(), SetMode::Overwrite)
    .await
    .unwrap();
  s.set(path::user("u1").unwrap(), Fields::new(), SetMode::Overwrite)
    .await
    .unwrap();

  let docs = s.list(path::my_groups("u1").unwrap()).await.unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0].path.id(), "g1");
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn transaction_commits_all_writes() {
  let s = store().await;
  let a = path::user("a").unwrap();
  let b = path::user("b").unwrap();
  let (ta, tb) = (a.clone(), b.clone());

  let n = s
    .run_transaction(move |tx| {
      tx.set(&ta, Fields::new().with("x", 1), SetMode::Overwrite)?;
      tx.set(&tb, Fields::new().with("x", 2), SetMode::Overwrite)?;
      Ok(2)
    })
    .await
    .unwrap();

  assert_eq!(n, 2);
  assert!(s.get(a).await.unwrap().is_some());
  assert!(s.get(b).await.unwrap().is_some());
}

#[tokio::test]
async fn transaction_sees_its_own_writes() {
  let s = store().await;
  let p = path::user("a").unwrap();
  let seen = s
    .run_transaction(move |tx| {
      tx.set(&p, Fields::new().with("x", 1), SetMode::Overwrite)?;
      Ok(tx.get(&p)?.is_some())
    })
    .await
    .unwrap();
  assert!(seen);
}

#[tokio::test]
async fn transaction_error_rolls_back_every_write() {
  let s = store().await;
  let p = path::user("a").unwrap();
  let target = p.clone();

  let err = s
    .run_transaction(move |tx| -> hearth_core::Result<()> {
      tx.set(&target, Fields::new().with("x", 1), SetMode::Overwrite)?;
      Err(Error::Validation("stop".into()))
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Validation(_)));
  assert!(s.get(p).await.unwrap().is_none());
}

#[tokio::test]
async fn conflicting_transaction_is_retried() {
  let s = store().await;
  let runs = Arc::new(AtomicU32::new(0));
  let counter = Arc::clone(&runs);
  let p = path::user("a").unwrap();
  let target = p.clone();

  s.run_transaction(move |tx| {
    tx.set(&target, Fields::new().with("x", 1), SetMode::Overwrite)?;
    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
      return Err(Error::Conflict);
    }
    Ok(())
  })
  .await
  .unwrap();

  assert_eq!(runs.load(Ordering::SeqCst), 3);
  assert!(s.get(p).await.unwrap().is_some());
}

#[tokio::test]
async fn persistent_conflict_aborts_after_max_attempts() {
  let s = Arc::new(
    SqliteStore::open_in_memory()
      .await
      .unwrap()
      .with_max_attempts(3),
  );
  let runs = Arc::new(AtomicU32::new(0));
  let counter = Arc::clone(&runs);

  let err = s
    .run_transaction(move |_tx| -> hearth_core::Result<()> {
      counter.fetch_add(1, Ordering::SeqCst);
      Err(Error::Conflict)
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::TransactionAborted { attempts: 3 }));
  assert_eq!(runs.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn max_attempts_is_at_least_one() {
  let s = SqliteStore::open_in_memory()
    .await
    .unwrap()
    .with_max_attempts(0);
  assert_eq!(s.max_attempts(), 1);
}

#[tokio::test]
async fn sqlite_busy_inside_a_transaction_is_retried() {
  let s = store().await;
  let runs = Arc::new(AtomicU32::new(0));
  let counter = Arc::clone(&runs);
  let p = path::user("a").unwrap();
  let target = p.clone();

  s.run_transaction(move |tx| {
    tx.set(&target, Fields::new().with("x", 1), SetMode::Overwrite)?;
    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
      let busy = rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        None,
      );
      return Err(crate::Error::Sqlite(busy).into());
    }
    Ok(())
  })
  .await
  .unwrap();

  assert_eq!(runs.load(Ordering::SeqCst), 2);
  assert!(s.get(p).await.unwrap().is_some());
}

#[tokio::test]
async fn dropped_transaction_does_not_commit() {
  let s = store().await;
  let p = path::user("cancelled").unwrap();
  let target = p.clone();

  let handle = tokio::spawn({
    let s = Arc::clone(&s);
    async move {
      s.run_transaction(move |tx| {
        std::thread::sleep(Duration::from_millis(200));
        tx.set(&target, Fields::new().with("x", 1), SetMode::Overwrite)
      })
      .await
    }
  });

  tokio::time::sleep(Duration::from_millis(50)).await;
  handle.abort();
  tokio::time::sleep(Duration::from_millis(400)).await;

  assert!(s.get(p).await.unwrap().is_none());
}

// ─── Invite then accept ──────────────────────────────────────────────────────

#[tokio::test]
async fn invite_writes_pending_invitation() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let inv = invitation(&s, "u2", "g1").await.unwrap();
  assert_eq!(inv.group_id.as_deref(), Some("g1"));
  assert_eq!(inv.status, Some(InviteStatus::Pending));
  assert_eq!(inv.sent_from.as_deref(), Some("u1"));
  assert!(inv.sent_at.is_some());
}

#[tokio::test]
async fn reinvite_overwrites_pending_invitation() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  writer(&s).invite("g1", "u3", "u2").await.unwrap();

  let inv = invitation(&s, "u2", "g1").await.unwrap();
  assert_eq!(inv.sent_from.as_deref(), Some("u3"));
  assert_eq!(group::pending_invites(&*s, "u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn invite_rejects_existing_member() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", true).await.unwrap();

  let err = writer(&s).invite("g1", "u1", "u2").await.unwrap_err();
  assert!(matches!(
    err,
    Error::AlreadyMember { ref group_id, ref user_id } if group_id == "g1" && user_id == "u2"
  ));
  assert!(invitation(&s, "u2", "g1").await.is_none());
}

#[tokio::test]
async fn invite_validates_identifiers() {
  let s = store().await;
  let err = writer(&s).invite("", "u1", "u2").await.unwrap_err();
  assert!(matches!(err, Error::Validation(ref m) if m.contains("group_id")));

  let err = writer(&s).invite("g1", "u1", "a/b").await.unwrap_err();
  assert!(matches!(err, Error::Validation(ref m) if m.contains("invitee")));
}

#[tokio::test]
async fn accept_creates_membership_and_mirror() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let outcome = resolver(&s).resolve("u2", "g1", true).await.unwrap();
  assert_eq!(outcome, Resolution::AcceptedNew);

  let m = membership(&s, "g1", "u2").await.unwrap();
  assert_eq!(m.user_id.as_deref(), Some("u2"));
  assert_eq!(m.added_by.as_deref(), Some("u2"));
  assert_eq!(m.user_name.as_deref(), Some("u2"));
  assert!(m.joined_at.is_some());

  let mg = mirror(&s, "u2", "g1").await.unwrap();
  assert_eq!(mg.group_id.as_deref(), Some("/groups/g1"));
  assert_eq!(mg.timestamp, m.joined_at);

  assert!(invitation(&s, "u2", "g1").await.is_none());
}

#[tokio::test]
async fn accept_uses_profile_display_name() {
  let s = store().await;
  profile::upsert_profile(&*s, "u2", None, Some("Sam".into()))
    .await
    .unwrap();
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", true).await.unwrap();

  let m = membership(&s, "g1", "u2").await.unwrap();
  assert_eq!(m.user_name.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn accept_falls_back_to_user_id_for_blank_name() {
  let s = store().await;
  s.set(
    path::user("u2").unwrap(),
    Fields::new().with("user_name", ""),
    SetMode::Overwrite,
  )
  .await
  .unwrap();
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", true).await.unwrap();

  let m = membership(&s, "g1", "u2").await.unwrap();
  assert_eq!(m.user_name.as_deref(), Some("u2"));
}

#[tokio::test]
async fn accept_twice_is_idempotent() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let first = resolver(&s).resolve("u2", "g1", true).await.unwrap();
  let joined = membership(&s, "g1", "u2").await.unwrap().joined_at;
  let second = resolver(&s).resolve("u2", "g1", true).await.unwrap();

  assert_eq!(first, Resolution::AcceptedNew);
  assert_eq!(second, Resolution::AcceptedAlreadyMember);
  assert_eq!(member_count(&s, "g1").await, 1);
  assert_eq!(membership(&s, "g1", "u2").await.unwrap().joined_at, joined);
}

#[tokio::test]
async fn accept_without_invite_is_not_found() {
  let s = store().await;
  let err = resolver(&s).resolve("u2", "g1", true).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InviteNotFound { ref group_id, ref user_id } if group_id == "g1" && user_id == "u2"
  ));
  assert!(membership(&s, "g1", "u2").await.is_none());
  assert!(mirror(&s, "u2", "g1").await.is_none());
}

#[tokio::test]
async fn accept_repairs_leftover_invitation() {
  let s = store().await;
  // Membership exists but the invitation and mirror were never cleaned up.
  s.set(
    path::member("g1", "u2").unwrap(),
    Fields::new().with("user_id", "u2").with("user_name", "Old"),
    SetMode::Overwrite,
  )
  .await
  .unwrap();
  s.set(
    path::group_invite("u2", "g1").unwrap(),
    Fields::new().with("group_id", "g1").with("status", "pending"),
    SetMode::Overwrite,
  )
  .await
  .unwrap();

  let outcome = resolver(&s).resolve("u2", "g1", true).await.unwrap();
  assert_eq!(outcome, Resolution::AcceptedAlreadyMember);
  assert!(invitation(&s, "u2", "g1").await.is_none());
  assert!(mirror(&s, "u2", "g1").await.is_some());
  assert_eq!(
    membership(&s, "g1", "u2").await.unwrap().user_name.as_deref(),
    Some("Old")
  );
}

#[tokio::test]
async fn accept_keeps_unrelated_mirror_fields() {
  let s = store().await;
  s.set(
    path::my_group("u2", "g1").unwrap(),
    Fields::new().with("pinned", true),
    SetMode::Overwrite,
  )
  .await
  .unwrap();
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", true).await.unwrap();

  let doc = s.get(path::my_group("u2", "g1").unwrap()).await.unwrap().unwrap();
  assert_eq!(doc.fields["pinned"], json!(true));
  assert_eq!(doc.fields["group_id"], json!("/groups/g1"));
}

#[tokio::test]
async fn concurrent_accepts_create_one_membership() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let (r1, r2) = (resolver(&s), resolver(&s));
  let (a, b) = tokio::join!(r1.resolve("u2", "g1", true), r2.resolve("u2", "g1", true));
  let mut outcomes = vec![a.unwrap(), b.unwrap()];
  outcomes.sort_by_key(|o| *o == Resolution::AcceptedAlreadyMember);

  assert_eq!(outcomes, vec![Resolution::AcceptedNew, Resolution::AcceptedAlreadyMember]);
  assert_eq!(member_count(&s, "g1").await, 1);
  assert!(invitation(&s, "u2", "g1").await.is_none());
}

// ─── Decline ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn decline_deletes_invitation_only() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let outcome = resolver(&s).resolve("u2", "g1", false).await.unwrap();
  assert_eq!(outcome, Resolution::Declined);
  assert!(invitation(&s, "u2", "g1").await.is_none());
  assert!(membership(&s, "g1", "u2").await.is_none());
  assert!(mirror(&s, "u2", "g1").await.is_none());
}

#[tokio::test]
async fn decline_twice_succeeds() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  resolver(&s).resolve("u2", "g1", false).await.unwrap();
  let again = resolver(&s).resolve("u2", "g1", false).await.unwrap();
  assert_eq!(again, Resolution::Declined);
}

#[tokio::test]
async fn decline_after_accept_leaves_membership() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", true).await.unwrap();

  resolver(&s).resolve("u2", "g1", false).await.unwrap();
  assert!(membership(&s, "g1", "u2").await.is_some());
}

#[tokio::test]
async fn resolve_validates_identifiers() {
  let s = store().await;
  let err = resolver(&s).resolve("", "g1", false).await.unwrap_err();
  assert!(matches!(err, Error::Validation(ref m) if m.contains("user_id")));

  let err = resolver(&s).resolve("u2", "..", true).await.unwrap_err();
  assert!(matches!(err, Error::Validation(ref m) if m.contains("group_id")));
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_invite_accept_lists_group() {
  let s = store().await;
  let gid = group::create_group(&*s, "u1").await.unwrap();

  assert_eq!(member_count(&s, &gid).await, 1);
  let creator = membership(&s, &gid, "u1").await.unwrap();
  assert_eq!(creator.added_by.as_deref(), Some("u1"));

  writer(&s).invite(&gid, "u1", "u2").await.unwrap();
  let pending = group::pending_invites(&*s, "u2").await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].id, gid);

  resolver(&s).resolve("u2", &gid, true).await.unwrap();

  assert_eq!(member_count(&s, &gid).await, 2);
  assert!(group::pending_invites(&*s, "u2").await.unwrap().is_empty());
  let groups = group::my_groups(&*s, "u2").await.unwrap();
  assert_eq!(groups.len(), 1);
  assert_eq!(groups[0].id, gid);
  assert_eq!(groups[0].record.group_id, Some(format!("/groups/{gid}")));
}

#[tokio::test]
async fn creator_cannot_be_invited_to_own_group() {
  let s = store().await;
  let gid = group::create_group(&*s, "u1").await.unwrap();
  let err = writer(&s).invite(&gid, "u1", "u1").await.unwrap_err();
  assert!(matches!(err, Error::AlreadyMember { .. }));
}

#[tokio::test]
async fn invite_decline_reinvite_accept() {
  let s = store().await;
  writer(&s).invite("g1", "u1", "u2").await.unwrap();
  resolver(&s).resolve("u2", "g1", false).await.unwrap();
  writer(&s).invite("g1", "u1", "u2").await.unwrap();

  let outcome = resolver(&s).resolve("u2", "g1", true).await.unwrap();
  assert_eq!(outcome, Resolution::AcceptedNew);
  assert_eq!(member_count(&s, "g1").await, 1);
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_upsert_sets_defaults_once() {
  let s = store().await;
  profile::upsert_profile(&*s, "u1", Some("a@example.com".into()), None)
    .await
    .unwrap();
  let first = profile::get_profile(&*s, "u1").await.unwrap().unwrap();
  assert_eq!(first.record.uid.as_deref(), Some("u1"));
  assert_eq!(first.record.role.as_deref(), Some(profile::DEFAULT_ROLE));

  profile::upsert_profile(&*s, "u1", None, Some("Ann".into()))
    .await
    .unwrap();
  let second = profile::get_profile(&*s, "u1").await.unwrap().unwrap();
  assert_eq!(second.record.email.as_deref(), Some("a@example.com"));
  assert_eq!(second.record.user_name.as_deref(), Some("Ann"));
  assert_eq!(second.record.created_at, first.record.created_at);
}

#[tokio::test]
async fn profile_delete_reports_existence() {
  let s = store().await;
  profile::upsert_profile(&*s, "u1", None, None).await.unwrap();
  assert!(profile::delete_profile(&*s, "u1").await.unwrap());
  assert!(!profile::delete_profile(&*s, "u1").await.unwrap());
  assert!(profile::get_profile(&*s, "u1").await.unwrap().is_none());
}

// ─── Chores ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chores_are_listed_per_group() {
  let s = store().await;
  let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
  let id = chore::add_chore(&*s, NewChore {
    group_id:        "g1".into(),
    created_by:      "u1".into(),
    chore_name:      "Dishes".into(),
    chore_details:   None,
    chore_due_date:  due,
    chore_frequency: ChoreFrequency::Weekly,
    chore_assignee:  Some("u2".into()),
  })
  .await
  .unwrap();

  let chores = chore::list_chores(&*s, "g1").await.unwrap();
  assert_eq!(chores.len(), 1);
  assert_eq!(chores[0].id, id);
  assert_eq!(chores[0].record.chore_name.as_deref(), Some("Dishes"));
  assert_eq!(chores[0].record.chore_due_date, Some(due));
  assert_eq!(chores[0].record.chore_frequency, Some(ChoreFrequency::Weekly));
  assert!(chore::list_chores(&*s, "g2").await.unwrap().is_empty());
}

#[tokio::test]
async fn chore_requires_a_name() {
  let s = store().await;
  let err = chore::add_chore(&*s, NewChore {
    group_id:        "g1".into(),
    created_by:      "u1".into(),
    chore_name:      "  ".into(),
    chore_details:   None,
    chore_due_date:  NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    chore_frequency: ChoreFrequency::Daily,
    chore_assignee:  None,
  })
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}
