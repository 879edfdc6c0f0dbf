//! Lead analytics: the aggregate behind the admin dashboard and reports.
//!
//! [`aggregate`] is a pure function over an already-filtered list. It never
//! filters on its own and cannot fail; every ratio with an empty denominator
//! is reported as `0.0`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
  classify::{Priority, contains_any},
  contact::{ContactStatus, ContactSubmission},
};

/// Terms that flag a lead as a likely applicant.
pub const POTENTIAL_STUDENT_KEYWORDS: &[&str] =
  &["student", "admission", "enrollment", "apply"];

/// Subject keywords per topic, in precedence order. Anything unmatched lands
/// in [`SubjectTopic::General`].
pub const TOPIC_KEYWORDS: &[(SubjectTopic, &[&str])] = &[
  (SubjectTopic::Admissions, &["admission", "apply", "enroll"]),
  (SubjectTopic::Courses, &["course", "program", "curriculum", "syllabus"]),
  (SubjectTopic::Financial, &["fee", "scholarship", "payment", "financial"]),
  (SubjectTopic::Placement, &["placement", "career", "job", "internship"]),
];

const WINDOW_DAYS: i64 = 7;

// ─── Topics ──────────────────────────────────────────────────────────────────

/// Coarse subject bucket.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SubjectTopic {
  Admissions,
  Courses,
  Financial,
  Placement,
  General,
}

impl SubjectTopic {
  /// Bucket a subject line. First matching topic wins.
  pub fn of(subject: &str) -> Self {
    let folded = subject.to_lowercase();
    TOPIC_KEYWORDS
      .iter()
      .find(|(_, keywords)| contains_any(&folded, keywords))
      .map(|(topic, _)| *topic)
      .unwrap_or(Self::General)
  }
}

// ─── Breakdowns ──────────────────────────────────────────────────────────────

/// Submission count per status; every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
  pub new:      usize,
  pub read:     usize,
  pub replied:  usize,
  pub archived: usize,
}

impl StatusBreakdown {
  pub fn get(&self, status: ContactStatus) -> usize {
    match status {
      ContactStatus::New => self.new,
      ContactStatus::Read => self.read,
      ContactStatus::Replied => self.replied,
      ContactStatus::Archived => self.archived,
    }
  }

  fn bump(&mut self, status: ContactStatus) {
    match status {
      ContactStatus::New => self.new += 1,
      ContactStatus::Read => self.read += 1,
      ContactStatus::Replied => self.replied += 1,
      ContactStatus::Archived => self.archived += 1,
    }
  }

  pub fn total(&self) -> usize {
    self.new + self.read + self.replied + self.archived
  }
}

/// Submission count per classifier tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
  pub high:   usize,
  pub medium: usize,
  pub low:    usize,
}

impl PriorityBreakdown {
  pub fn get(&self, priority: Priority) -> usize {
    match priority {
      Priority::High => self.high,
      Priority::Medium => self.medium,
      Priority::Low => self.low,
    }
  }

  fn bump(&mut self, priority: Priority) {
    match priority {
      Priority::High => self.high += 1,
      Priority::Medium => self.medium += 1,
      Priority::Low => self.low += 1,
    }
  }

  pub fn total(&self) -> usize { self.high + self.medium + self.low }
}

/// Submission count per [`SubjectTopic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubjectAnalysis {
  pub admissions: usize,
  pub courses:    usize,
  pub financial:  usize,
  pub placement:  usize,
  pub general:    usize,
}

impl SubjectAnalysis {
  pub fn get(&self, topic: SubjectTopic) -> usize {
    match topic {
      SubjectTopic::Admissions => self.admissions,
      SubjectTopic::Courses => self.courses,
      SubjectTopic::Financial => self.financial,
      SubjectTopic::Placement => self.placement,
      SubjectTopic::General => self.general,
    }
  }

  fn bump(&mut self, topic: SubjectTopic) {
    match topic {
      SubjectTopic::Admissions => self.admissions += 1,
      SubjectTopic::Courses => self.courses += 1,
      SubjectTopic::Financial => self.financial += 1,
      SubjectTopic::Placement => self.placement += 1,
      SubjectTopic::General => self.general += 1,
    }
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Dashboard aggregate over a list of submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsAnalytics {
  pub total_leads:         usize,
  pub status_breakdown:    StatusBreakdown,
  pub priority_breakdown:  PriorityBreakdown,
  pub subject_analysis:    SubjectAnalysis,
  /// Submitted within the last seven days.
  pub recent_leads:        usize,
  /// Submitted in the seven days before that.
  pub previous_week_leads: usize,
  /// Week-over-week change in percent.
  pub growth:              f64,
  pub potential_students:  usize,
  pub conversion_rate:     f64,
  pub response_rate:       f64,
}

/// Whether a submission reads like it came from a prospective student.
pub fn is_potential_student(contact: &ContactSubmission) -> bool {
  let text =
    format!("{} {}", contact.subject, contact.message).to_lowercase();
  let notes = contact
    .admin_notes
    .as_deref()
    .map(str::to_lowercase)
    .unwrap_or_default();
  contains_any(&notes, POTENTIAL_STUDENT_KEYWORDS)
    || contains_any(&text, POTENTIAL_STUDENT_KEYWORDS)
}

/// Compute the aggregate for `contacts` relative to `now`.
pub fn aggregate(
  contacts: &[ContactSubmission],
  now: DateTime<Utc>,
) -> LeadsAnalytics {
  let recent_start = now - Duration::days(WINDOW_DAYS);
  let previous_start = recent_start - Duration::days(WINDOW_DAYS);

  let mut out = LeadsAnalytics {
    total_leads: contacts.len(),
    ..LeadsAnalytics::default()
  };

  for c in contacts {
    out.status_breakdown.bump(c.status);
    out.priority_breakdown.bump(c.priority());
    out.subject_analysis.bump(SubjectTopic::of(&c.subject));

    if c.submitted_at >= recent_start {
      out.recent_leads += 1;
    } else if c.submitted_at >= previous_start {
      out.previous_week_leads += 1;
    }

    if is_potential_student(c) {
      out.potential_students += 1;
    }
  }

  out.growth = if out.previous_week_leads == 0 {
    0.0
  } else {
    let delta = out.recent_leads as f64 - out.previous_week_leads as f64;
    round2(delta / out.previous_week_leads as f64 * 100.0)
  };
  out.conversion_rate = percentage(out.potential_students, out.total_leads);
  out.response_rate =
    percentage(out.status_breakdown.replied, out.total_leads);

  out
}

/// `part / whole` as a percentage with two decimals; `0.0` when `whole == 0`.
pub fn percentage(part: usize, whole: usize) -> f64 {
  if whole == 0 {
    0.0
  } else {
    round2(part as f64 / whole as f64 * 100.0)
  }
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }
