//! Keyword-based lead priority.
//!
//! Matching is plain substring containment over case-folded text, so a
//! keyword buried inside a longer word still counts ("fee" matches
//! "feedback"). High-priority keywords are checked first and always win.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Admission, fee and urgency terms.
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
  "admission",
  "enrollment",
  "apply",
  "fee",
  "scholarship",
  "deadline",
  "urgent",
  "asap",
  "immediately",
];

/// General-inquiry terms.
pub const MEDIUM_PRIORITY_KEYWORDS: &[&str] = &[
  "information",
  "details",
  "inquiry",
  "enquiry",
  "career",
  "course",
  "program",
  "placement",
  "campus",
];

/// Apparent urgency of a lead.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  High,
  Medium,
  Low,
}

impl Priority {
  /// Capitalised label used in exported reports.
  pub fn label(self) -> &'static str {
    match self {
      Self::High => "High",
      Self::Medium => "Medium",
      Self::Low => "Low",
    }
  }
}

/// Returns `true` if any of `keywords` occurs in `folded`.
///
/// `folded` must already be lowercase.
pub fn contains_any(folded: &str, keywords: &[&str]) -> bool {
  keywords.iter().any(|k| folded.contains(k))
}

/// Classify free text into a [`Priority`].
pub fn classify(text: &str) -> Priority {
  let folded = text.to_lowercase();
  if contains_any(&folded, HIGH_PRIORITY_KEYWORDS) {
    Priority::High
  } else if contains_any(&folded, MEDIUM_PRIORITY_KEYWORDS) {
    Priority::Medium
  } else {
    Priority::Low
  }
}

/// Classify a submission by its subject and message together.
pub fn classify_submission(subject: &str, message: &str) -> Priority {
  classify(&format!("{subject} {message}"))
}
