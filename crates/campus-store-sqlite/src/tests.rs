//! Integration tests for `SqliteStore` against an in-memory database.

use campus_core::{
  analytics::aggregate,
  contact::{ContactStatus, NewContact},
  filter::LeadFilter,
  store::{ContactStore, Page},
};
use chrono::Utc;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_contact(name: &str, subject: &str) -> NewContact {
  NewContact {
    name:    name.into(),
    email:   format!("{}@example.com", name.to_lowercase()),
    phone:   None,
    subject: subject.into(),
    message: "Please get back to me.".into(),
  }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_contact() {
  let s = store().await;

  let created = s.create_contact(new_contact("Asha", "Admission Information")).await.unwrap();
  assert_eq!(created.status, ContactStatus::New);
  assert!(created.replied_at.is_none());

  let fetched = s.get_contact(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_contact(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn phone_roundtrips() {
  let s = store().await;
  let mut input = new_contact("Ravi", "Fees");
  input.phone = Some("+91 98765 43210".into());
  let created = s.create_contact(input).await.unwrap();
  let fetched = s.get_contact(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.phone.as_deref(), Some("+91 98765 43210"));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let first = s.create_contact(new_contact("A", "One")).await.unwrap();
  let second = s.create_contact(new_contact("B", "Two")).await.unwrap();

  let all = s.list_contacts(&LeadFilter::default(), None).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all[0].submitted_at >= all[1].submitted_at);
  let ids: Vec<_> = all.iter().map(|c| c.id).collect();
  assert!(ids.contains(&first.id) && ids.contains(&second.id));
}

#[tokio::test]
async fn list_paginates_and_counts() {
  let s = store().await;
  for i in 0..7 {
    s.create_contact(new_contact(&format!("L{i}"), "Hello")).await.unwrap();
  }
  let filter = LeadFilter::default();

  let page1 = s.list_contacts(&filter, Some(Page::new(Some(1), Some(5)))).await.unwrap();
  let page2 = s.list_contacts(&filter, Some(Page::new(Some(2), Some(5)))).await.unwrap();
  assert_eq!(page1.len(), 5);
  assert_eq!(page2.len(), 2);
  assert!(page1.iter().all(|c| !page2.iter().any(|d| d.id == c.id)));
  assert_eq!(s.count_contacts(&filter).await.unwrap(), 7);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
  let s = store().await;
  s.create_contact(new_contact("A", "Hello")).await.unwrap();

  let page = Page::new(Some(usize::MAX), Some(10));
  let hits = s.list_contacts(&LeadFilter::default(), Some(page)).await.unwrap();
  assert!(hits.is_empty());

  let raw = Page { page: usize::MAX, limit: 100 };
  let hits = s.list_contacts(&LeadFilter::default(), Some(raw)).await.unwrap();
  assert!(hits.is_empty());
}

#[tokio::test]
async fn filter_by_subject_is_case_insensitive() {
  let s = store().await;
  s.create_contact(new_contact("A", "Admission Information")).await.unwrap();
  s.create_contact(new_contact("B", "Hostel fees")).await.unwrap();
  s.create_contact(new_contact("C", "late ADMISSION")).await.unwrap();

  let filter = LeadFilter::parse(None, None, Some("admission"), None).unwrap();
  let hits = s.list_contacts(&filter, None).await.unwrap();
  assert_eq!(hits.len(), 2);
  assert_eq!(s.count_contacts(&filter).await.unwrap(), 2);
}

#[tokio::test]
async fn subject_filter_folds_non_ascii_case() {
  let s = store().await;
  s.create_contact(new_contact("A", "ÉCOLE d'été")).await.unwrap();
  s.create_contact(new_contact("B", "Ölçme ve DEĞERLENDİRME")).await.unwrap();
  s.create_contact(new_contact("C", "Library hours")).await.unwrap();

  let filter = LeadFilter::parse(None, None, Some("école"), None).unwrap();
  let hits = s.list_contacts(&filter, None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "A");
  assert!(filter.matches(&hits[0]));

  let filter = LeadFilter::parse(None, None, Some("ÖLÇME"), None).unwrap();
  assert_eq!(s.count_contacts(&filter).await.unwrap(), 1);
}

#[tokio::test]
async fn subject_filter_treats_wildcards_literally() {
  let s = store().await;
  s.create_contact(new_contact("A", "100% scholarship")).await.unwrap();
  s.create_contact(new_contact("B", "1000 seats")).await.unwrap();

  let filter = LeadFilter::parse(None, None, Some("100%"), None).unwrap();
  let hits = s.list_contacts(&filter, None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "A");
}

#[tokio::test]
async fn filter_by_status_and_dates() {
  let s = store().await;
  let a = s.create_contact(new_contact("A", "One")).await.unwrap();
  s.create_contact(new_contact("B", "Two")).await.unwrap();
  s.set_status(a.id, ContactStatus::Archived).await.unwrap();

  let archived = LeadFilter::parse(None, None, None, Some("archived")).unwrap();
  let hits = s.list_contacts(&archived, None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, a.id);

  let future = LeadFilter::parse(Some("2999-01-01"), None, None, None).unwrap();
  assert_eq!(s.count_contacts(&future).await.unwrap(), 0);

  let past = LeadFilter::parse(Some("2000-01-01"), Some("2999-12-31"), None, None).unwrap();
  assert_eq!(s.count_contacts(&past).await.unwrap(), 2);
}

// ─── Mutations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn replied_status_stamps_replied_at() {
  let s = store().await;
  let c = s.create_contact(new_contact("A", "Admission")).await.unwrap();

  let before = Utc::now();
  let updated = s.set_status(c.id, ContactStatus::Replied).await.unwrap().unwrap();
  assert_eq!(updated.status, ContactStatus::Replied);
  let replied_at = updated.replied_at.expect("replied_at set");
  assert!(replied_at >= before - chrono::Duration::seconds(1));

  let fetched = s.get_contact(c.id).await.unwrap().unwrap();
  assert_eq!(fetched.replied_at, Some(replied_at));
  assert_eq!(fetched.submitted_at, c.submitted_at);
}

#[tokio::test]
async fn reply_is_reflected_in_response_rate() {
  let s = store().await;
  let a = s.create_contact(new_contact("A", "One")).await.unwrap();
  s.create_contact(new_contact("B", "Two")).await.unwrap();

  let filter = LeadFilter::default();
  let before = aggregate(&s.list_contacts(&filter, None).await.unwrap(), Utc::now());
  assert_eq!(before.response_rate, 0.0);

  s.set_status(a.id, ContactStatus::Replied).await.unwrap();
  let after = aggregate(&s.list_contacts(&filter, None).await.unwrap(), Utc::now());
  assert_eq!(after.response_rate, 50.0);
}

#[tokio::test]
async fn other_statuses_leave_replied_at_alone() {
  let s = store().await;
  let c = s.create_contact(new_contact("A", "One")).await.unwrap();
  let updated = s.set_status(c.id, ContactStatus::Read).await.unwrap().unwrap();
  assert!(updated.replied_at.is_none());
}

#[tokio::test]
async fn set_status_on_missing_returns_none() {
  let s = store().await;
  assert!(s.set_status(Uuid::new_v4(), ContactStatus::Read).await.unwrap().is_none());
}

#[tokio::test]
async fn notes_set_and_clear() {
  let s = store().await;
  let c = s.create_contact(new_contact("A", "One")).await.unwrap();

  let noted = s
    .set_admin_notes(c.id, Some("Called back, wants prospectus".into()))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(noted.admin_notes.as_deref(), Some("Called back, wants prospectus"));

  let cleared = s.set_admin_notes(c.id, None).await.unwrap().unwrap();
  assert!(cleared.admin_notes.is_none());

  assert!(s.set_admin_notes(Uuid::new_v4(), None).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_contact() {
  let s = store().await;
  let c = s.create_contact(new_contact("A", "One")).await.unwrap();
  assert!(s.delete_contact(c.id).await.unwrap());
  assert!(s.get_contact(c.id).await.unwrap().is_none());
  assert!(!s.delete_contact(c.id).await.unwrap());
}
