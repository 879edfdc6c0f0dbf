//! XLSX rendering: a detail sheet mirroring the CSV plus a summary sheet.

use campus_core::{analytics::LeadsAnalytics, contact::ContactSubmission, filter::LeadFilter};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
  Result,
  table::{HEADERS, SummaryValue, detail_row, summary_rows},
};

const DETAIL_SHEET: &str = "Student Leads";
const SUMMARY_SHEET: &str = "Summary";

/// Column widths for the detail sheet, in character units.
const DETAIL_WIDTHS: [f64; 10] = [22.0, 30.0, 16.0, 32.0, 48.0, 10.0, 10.0, 24.0, 24.0, 32.0];

pub fn render(
  contacts: &[ContactSubmission],
  filter: &LeadFilter,
  analytics: &LeadsAnalytics,
  generated_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let bold = Format::new().set_bold();

  let detail = workbook.add_worksheet();
  detail.set_name(DETAIL_SHEET)?;
  for (col, (header, width)) in HEADERS.iter().zip(DETAIL_WIDTHS).enumerate() {
    detail.write_string_with_format(0, col as u16, *header, &bold)?;
    detail.set_column_width(col as u16, width)?;
  }
  for (i, contact) in contacts.iter().enumerate() {
    let row = i as u32 + 1;
    for (col, cell) in detail_row(contact).into_iter().enumerate() {
      detail.write_string(row, col as u16, cell)?;
    }
  }

  let summary = workbook.add_worksheet();
  summary.set_name(SUMMARY_SHEET)?;
  summary.set_column_width(0, 24)?;
  summary.set_column_width(1, 48)?;
  for (i, (label, value)) in summary_rows(filter, analytics, generated_at).into_iter().enumerate() {
    let row = i as u32;
    match value {
      SummaryValue::Heading => {
        summary.write_string_with_format(row, 0, label, &bold)?;
      }
      SummaryValue::Blank => {}
      SummaryValue::Text(text) => {
        summary.write_string(row, 0, label)?;
        summary.write_string(row, 1, text)?;
      }
      SummaryValue::Count(n) => {
        summary.write_string(row, 0, label)?;
        summary.write_number(row, 1, n as f64)?;
      }
      SummaryValue::Percent(p) => {
        summary.write_string(row, 0, label)?;
        summary.write_number(row, 1, p)?;
      }
    }
  }

  Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
  use campus_core::{analytics::aggregate, contact::ContactStatus};
  use chrono::TimeZone;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn produces_a_zip_container() {
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let contacts = vec![ContactSubmission {
      id:           Uuid::new_v4(),
      name:         "Kiran".into(),
      email:        "kiran@example.com".into(),
      phone:        None,
      subject:      "Placement record".into(),
      message:      "What are the placement numbers?".into(),
      status:       ContactStatus::Read,
      submitted_at: at,
      replied_at:   None,
      admin_notes:  Some("Sent brochure".into()),
    }];
    let analytics = aggregate(&contacts, at);
    let bytes = render(&contacts, &LeadFilter::default(), &analytics, at).unwrap();
    assert!(bytes.starts_with(b"PK"));
  }

  #[test]
  fn empty_list_still_renders() {
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let bytes = render(&[], &LeadFilter::default(), &aggregate(&[], at), at).unwrap();
    assert!(bytes.starts_with(b"PK"));
  }
}
