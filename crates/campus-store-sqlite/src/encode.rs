//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexicographic order equals chronological
//! order. UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr;

use campus_core::{
  contact::{ContactStatus, ContactSubmission},
  filter::LeadFilter,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ContactStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: ContactStatus) -> &'static str {
  match s {
    ContactStatus::New => "new",
    ContactStatus::Read => "read",
    ContactStatus::Replied => "replied",
    ContactStatus::Archived => "archived",
  }
}

pub fn decode_status(s: &str) -> Result<ContactStatus> {
  ContactStatus::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Filter → WHERE ──────────────────────────────────────────────────────────

/// Name of the Unicode-aware lowercase function registered on every connection.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// A `WHERE` clause (possibly empty) plus its positional parameters.
pub struct WhereClause {
  pub sql:    String,
  pub params: Vec<Value>,
}

/// Escape `%`, `_` and the escape character itself for a `LIKE … ESCAPE '\'`
/// pattern.
fn escape_like(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for ch in raw.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

pub fn encode_filter(filter: &LeadFilter) -> WhereClause {
  let mut conds: Vec<&'static str> = Vec::new();
  let mut params = Vec::new();

  if let Some(start) = filter.date_range.start {
    conds.push("submitted_at >= ?");
    params.push(Value::Text(encode_dt(start)));
  }
  if let Some(end) = filter.date_range.end {
    conds.push("submitted_at <= ?");
    params.push(Value::Text(encode_dt(end)));
  }
  if let Some(subject) = &filter.subject {
    // Both sides are folded to lowercase, so LIKE compares them verbatim.
    conds.push("unicode_lower(subject) LIKE ? ESCAPE '\\'");
    params.push(Value::Text(format!("%{}%", escape_like(&subject.to_lowercase()))));
  }
  if let Some(status) = filter.status {
    conds.push("status = ?");
    params.push(Value::Text(encode_status(status).to_owned()));
  }

  let sql = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  WhereClause { sql, params }
}

// ─── Row type ────────────────────────────────────────────────────────────────

pub const CONTACT_COLUMNS: &str = "contact_id, name, email, phone, subject, message, \
                                   status, submitted_at, replied_at, admin_notes";

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id:   String,
  pub name:         String,
  pub email:        String,
  pub phone:        Option<String>,
  pub subject:      String,
  pub message:      String,
  pub status:       String,
  pub submitted_at: String,
  pub replied_at:   Option<String>,
  pub admin_notes:  Option<String>,
}

impl RawContact {
  /// Read a row selected with [`CONTACT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:   row.get(0)?,
      name:         row.get(1)?,
      email:        row.get(2)?,
      phone:        row.get(3)?,
      subject:      row.get(4)?,
      message:      row.get(5)?,
      status:       row.get(6)?,
      submitted_at: row.get(7)?,
      replied_at:   row.get(8)?,
      admin_notes:  row.get(9)?,
    })
  }

  pub fn into_contact(self) -> Result<ContactSubmission> {
    Ok(ContactSubmission {
      id:           decode_uuid(&self.contact_id)?,
      name:         self.name,
      email:        self.email,
      phone:        self.phone,
      subject:      self.subject,
      message:      self.message,
      status:       decode_status(&self.status)?,
      submitted_at: decode_dt(&self.submitted_at)?,
      replied_at:   self.replied_at.as_deref().map(decode_dt).transpose()?,
      admin_notes:  self.admin_notes,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1500);
    assert_eq!(encode_dt(a), "2026-01-01T00:00:00.000000Z");
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
  }

  #[test]
  fn empty_filter_has_no_where() {
    let w = encode_filter(&LeadFilter::default());
    assert!(w.sql.is_empty());
    assert!(w.params.is_empty());
  }
}
