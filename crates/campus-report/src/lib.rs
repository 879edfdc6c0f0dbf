//! Lead report renderers: CSV, XLSX workbook and landscape PDF.
//!
//! Pure synchronous; takes an already-filtered list plus the filter that
//! produced it and returns the file bytes. No HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use campus_core::filter::LeadFilter;
//! use campus_report::{ReportFormat, render};
//!
//! let report = render(ReportFormat::Csv, &[], &LeadFilter::default(), chrono::Utc::now()).unwrap();
//! println!("{} ({} bytes)", report.file_name, report.bytes.len());
//! ```

mod delimited;
pub mod error;
mod pdf;
pub mod table;
mod workbook;

use bytes::Bytes;
use campus_core::{analytics::aggregate, contact::ContactSubmission, filter::LeadFilter};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use error::{Error, Result};

// ─── Format ──────────────────────────────────────────────────────────────────

/// Output format of a lead report.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
  Csv,
  Xlsx,
  Pdf,
}

impl ReportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Csv => "csv",
      Self::Xlsx => "xlsx",
      Self::Pdf => "pdf",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::Csv => "text/csv; charset=utf-8",
      Self::Xlsx => {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
      }
      Self::Pdf => "application/pdf",
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A rendered report ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct Report {
  pub file_name:    String,
  pub content_type: &'static str,
  pub bytes:        Bytes,
}

/// `student-leads-report-<ISO 8601 with ':' replaced by '-'>.<ext>`
pub fn file_name(format: ReportFormat, generated_at: DateTime<Utc>) -> String {
  let stamp = generated_at
    .to_rfc3339_opts(SecondsFormat::Millis, true)
    .replace(':', "-");
  format!("student-leads-report-{stamp}.{}", format.extension())
}

/// Render `contacts` (already filtered by `filter`) in `format`.
pub fn render(
  format: ReportFormat,
  contacts: &[ContactSubmission],
  filter: &LeadFilter,
  generated_at: DateTime<Utc>,
) -> Result<Report> {
  let bytes = match format {
    ReportFormat::Csv => delimited::render(contacts)?,
    ReportFormat::Xlsx => {
      let analytics = aggregate(contacts, generated_at);
      workbook::render(contacts, filter, &analytics, generated_at)?
    }
    ReportFormat::Pdf => {
      let analytics = aggregate(contacts, generated_at);
      pdf::render(contacts, filter, &analytics, generated_at)?
    }
  };

  Ok(Report {
    file_name: file_name(format, generated_at),
    content_type: format.content_type(),
    bytes: Bytes::from(bytes),
  })
}
