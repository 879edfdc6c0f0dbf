//! The `ContactStore` trait and pagination type.
//!
//! Implemented by storage backends (e.g. `campus-store-sqlite`). The API and
//! server crates depend on this abstraction, not on a concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  contact::{ContactStatus, ContactSubmission, NewContact},
  filter::LeadFilter,
};

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
/// Highest page number accepted; larger requests land on an empty page.
pub const MAX_PAGE: usize = 1_000_000;

/// A 1-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub page:  usize,
  pub limit: usize,
}

impl Page {
  /// Clamp caller-supplied values into range.
  pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
    Self {
      page:  page.unwrap_or(1).clamp(1, MAX_PAGE),
      limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
    }
  }

  /// Rows to skip. Saturates for hand-built pages outside the clamped range.
  pub fn offset(&self) -> usize { self.page.saturating_sub(1).saturating_mul(self.limit) }

  /// Number of pages needed for `total` rows.
  pub fn page_count(&self, total: usize) -> usize { total.div_ceil(self.limit) }
}

impl Default for Page {
  fn default() -> Self { Self::new(None, None) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact-submission store.
///
/// Every method returns a `Send` future so the trait can back an axum router
/// on a multi-threaded runtime.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new submission with status `new` and `submitted_at = now`.
  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<ContactSubmission, Self::Error>> + Send + '_;

  /// Retrieve a submission by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ContactSubmission>, Self::Error>> + Send + '_;

  /// Submissions matching `filter`, newest first. `page = None` returns every
  /// match.
  fn list_contacts<'a>(
    &'a self,
    filter: &'a LeadFilter,
    page: Option<Page>,
  ) -> impl Future<Output = Result<Vec<ContactSubmission>, Self::Error>> + Send + 'a;

  /// Number of submissions matching `filter`.
  fn count_contacts<'a>(
    &'a self,
    filter: &'a LeadFilter,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Change a submission's status, stamping `replied_at` when the new status
  /// is `replied`. Returns the updated record, or `None` if not found.
  fn set_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> impl Future<Output = Result<Option<ContactSubmission>, Self::Error>> + Send + '_;

  /// Replace the admin notes. `None` clears them.
  fn set_admin_notes(
    &self,
    id: Uuid,
    notes: Option<String>,
  ) -> impl Future<Output = Result<Option<ContactSubmission>, Self::Error>> + Send + '_;

  /// Delete a submission. Returns `false` if it did not exist.
  fn delete_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
