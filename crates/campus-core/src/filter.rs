//! The typed lead filter shared by the store, the analytics endpoint and the
//! report renderers.
//!
//! Query strings arrive as loose text; [`LeadFilter::parse`] turns them into a
//! filter once per request, rejecting anything it cannot interpret.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  contact::{ContactStatus, ContactSubmission},
};

// ─── DateRange ───────────────────────────────────────────────────────────────

/// Inclusive bounds on `submitted_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  #[serde(rename = "startDate", skip_serializing_if = "Option::is_none", default)]
  pub start: Option<DateTime<Utc>>,
  #[serde(rename = "endDate", skip_serializing_if = "Option::is_none", default)]
  pub end:   Option<DateTime<Utc>>,
}

impl DateRange {
  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at <= e)
  }

  pub fn is_unbounded(&self) -> bool { self.start.is_none() && self.end.is_none() }
}

// ─── LeadFilter ──────────────────────────────────────────────────────────────

/// Which submissions a listing, analytics call or report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
  #[serde(flatten)]
  pub date_range: DateRange,
  /// Case-insensitive substring of the subject line.
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub subject:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub status:     Option<ContactStatus>,
}

/// Which end of a date range a bare `YYYY-MM-DD` stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
  Start,
  End,
}

impl LeadFilter {
  /// Build a filter from raw query-string values. Empty strings count as
  /// absent.
  pub fn parse(
    start_date: Option<&str>,
    end_date: Option<&str>,
    subject: Option<&str>,
    status: Option<&str>,
  ) -> Result<Self> {
    let start = non_empty(start_date)
      .map(|raw| parse_date(raw, "startDate", Bound::Start))
      .transpose()?;
    let end = non_empty(end_date)
      .map(|raw| parse_date(raw, "endDate", Bound::End))
      .transpose()?;

    if let (Some(s), Some(e)) = (start, end)
      && s > e
    {
      return Err(Error::InvertedDateRange);
    }

    let status = non_empty(status)
      .map(|raw| {
        ContactStatus::from_str(raw)
          .map_err(|_| Error::UnknownStatus(raw.to_owned()))
      })
      .transpose()?;

    Ok(Self {
      date_range: DateRange { start, end },
      subject: non_empty(subject).map(str::to_owned),
      status,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.date_range.is_unbounded() && self.subject.is_none() && self.status.is_none()
  }

  /// In-memory equivalent of the store's query.
  pub fn matches(&self, contact: &ContactSubmission) -> bool {
    self.date_range.contains(contact.submitted_at)
      && self.status.is_none_or(|s| contact.status == s)
      && self.subject.as_deref().is_none_or(|needle| {
        contact.subject.to_lowercase().contains(&needle.to_lowercase())
      })
  }

  /// Human-readable summary printed at the top of reports.
  pub fn describe(&self) -> String {
    if self.is_empty() {
      return "All leads".to_owned();
    }
    let mut parts = Vec::new();
    if let Some(s) = self.date_range.start {
      parts.push(format!("From {}", s.format("%Y-%m-%d")));
    }
    if let Some(e) = self.date_range.end {
      parts.push(format!("To {}", e.format("%Y-%m-%d")));
    }
    if let Some(subject) = &self.subject {
      parts.push(format!("Subject contains \"{subject}\""));
    }
    if let Some(status) = self.status {
      parts.push(format!("Status: {status}"));
    }
    parts.join("; ")
  }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
  raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD`. A bare end date covers the
/// whole day.
fn parse_date(raw: &str, field: &'static str, bound: Bound) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }
  let invalid = || Error::InvalidDate { field, value: raw.to_owned() };
  let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
  let time = match bound {
    Bound::Start => NaiveTime::MIN,
    Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid)?,
  };
  Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  fn contact(subject: &str, status: ContactStatus, at: DateTime<Utc>) -> ContactSubmission {
    ContactSubmission {
      id: Uuid::new_v4(),
      name: "A".into(),
      email: "a@example.com".into(),
      phone: None,
      subject: subject.into(),
      message: String::new(),
      status,
      submitted_at: at,
      replied_at: None,
      admin_notes: None,
    }
  }

  #[test]
  fn empty_params_give_empty_filter() {
    let f = LeadFilter::parse(Some(""), Some("  "), Some(""), None).unwrap();
    assert!(f.is_empty());
    assert_eq!(f.describe(), "All leads");
  }

  #[test]
  fn bare_end_date_covers_whole_day() {
    let f = LeadFilter::parse(Some("2026-02-01"), Some("2026-02-01"), None, None).unwrap();
    let late = Utc.with_ymd_and_hms(2026, 2, 1, 23, 30, 0).unwrap();
    let next = Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap();
    assert!(f.date_range.contains(late));
    assert!(!f.date_range.contains(next));
  }

  #[test]
  fn rfc3339_dates_are_accepted() {
    let f = LeadFilter::parse(Some("2026-02-01T10:00:00+02:00"), None, None, None).unwrap();
    assert_eq!(
      f.date_range.start,
      Some(Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap())
    );
  }

  #[test]
  fn garbage_date_is_rejected() {
    let err = LeadFilter::parse(Some("yesterday"), None, None, None).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { field: "startDate", .. }));
    let err = LeadFilter::parse(None, Some("2026-13-40"), None, None).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { field: "endDate", .. }));
  }

  #[test]
  fn inverted_range_is_rejected() {
    let err = LeadFilter::parse(Some("2026-03-01"), Some("2026-02-01"), None, None).unwrap_err();
    assert!(matches!(err, Error::InvertedDateRange));
  }

  #[test]
  fn unknown_status_is_rejected() {
    let err = LeadFilter::parse(None, None, None, Some("pending")).unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(_)));
  }

  #[test]
  fn matches_subject_case_insensitively() {
    let at = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let f = LeadFilter::parse(None, None, Some("ADMISSION"), Some("new")).unwrap();
    assert!(f.matches(&contact("Admission query", ContactStatus::New, at)));
    assert!(!f.matches(&contact("Admission query", ContactStatus::Read, at)));
    assert!(!f.matches(&contact("Fees", ContactStatus::New, at)));
  }

  #[test]
  fn describe_lists_active_parts() {
    let f = LeadFilter::parse(Some("2026-01-01"), None, Some("fee"), Some("replied")).unwrap();
    assert_eq!(
      f.describe(),
      "From 2026-01-01; Subject contains \"fee\"; Status: replied"
    );
  }

  #[test]
  fn serializes_as_flat_query_shape() {
    let f = LeadFilter::parse(Some("2026-01-01"), None, None, Some("new")).unwrap();
    let json = serde_json::to_value(&f).unwrap();
    assert!(json.get("startDate").is_some());
    assert!(json.get("endDate").is_none());
    assert_eq!(json["status"], "new");
  }
}
