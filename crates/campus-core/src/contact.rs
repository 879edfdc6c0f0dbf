//! Contact-form submissions: the leads the admissions office works through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::classify::{Priority, classify_submission};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a submission sits in the admin workflow.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactStatus {
  #[default]
  New,
  Read,
  Replied,
  Archived,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A persisted contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
  pub id:           Uuid,
  pub name:         String,
  pub email:        String,
  pub phone:        Option<String>,
  pub subject:      String,
  pub message:      String,
  pub status:       ContactStatus,
  /// Set by the store on creation; never changes afterwards.
  pub submitted_at: DateTime<Utc>,
  /// Present iff the submission has been marked replied at least once.
  pub replied_at:   Option<DateTime<Utc>>,
  pub admin_notes:  Option<String>,
}

impl ContactSubmission {
  /// Priority tier of this lead, derived from its subject and message.
  pub fn priority(&self) -> Priority {
    classify_submission(&self.subject, &self.message)
  }

  /// Move to `status`. Marking a submission replied stamps `replied_at`
  /// with `now`; no other transition touches it.
  pub fn apply_status(&mut self, status: ContactStatus, now: DateTime<Utc>) {
    if status == ContactStatus::Replied {
      self.replied_at = Some(now);
    }
    self.status = status;
  }

  /// Opening a new submission in the admin view marks it read.
  ///
  /// Returns `true` if the status changed.
  pub fn mark_viewed(&mut self) -> bool {
    if self.status == ContactStatus::New {
      self.status = ContactStatus::Read;
      true
    } else {
      false
    }
  }
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::create_contact`].
/// `id`, `status` and `submitted_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewContact {
  pub name:    String,
  pub email:   String,
  pub phone:   Option<String>,
  pub subject: String,
  pub message: String,
}
