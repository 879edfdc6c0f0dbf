//! CSV rendering. Every field is quoted; embedded quotes are doubled.

use campus_core::contact::ContactSubmission;
use csv::{QuoteStyle, WriterBuilder};

use crate::{
  Error, Result,
  table::{HEADERS, detail_row},
};

pub fn render(contacts: &[ContactSubmission]) -> Result<Vec<u8>> {
  let mut writer = WriterBuilder::new()
    .quote_style(QuoteStyle::Always)
    .from_writer(Vec::new());

  writer.write_record(HEADERS)?;
  for c in contacts {
    writer.write_record(detail_row(c))?;
  }

  writer
    .into_inner()
    .map_err(|e| Error::Csv(e.into_error().into()))
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use campus_core::contact::ContactStatus;
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn contact(name: &str, subject: &str, status: ContactStatus) -> ContactSubmission {
    ContactSubmission {
      id: Uuid::new_v4(),
      name: name.into(),
      email: format!("{}@example.com", name.len()),
      phone: Some("555-0100".into()),
      subject: subject.into(),
      message: "Line one\nline two, with a comma".into(),
      status,
      submitted_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
      replied_at: None,
      admin_notes: None,
    }
  }

  #[test]
  fn fields_are_quoted_and_quotes_doubled() {
    let bytes = render(&[contact("Dr. \"Sam\" Rao", "Fees", ContactStatus::New)]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap().split(',').next().unwrap(), "\"Name\"");
    assert!(text.contains("\"Dr. \"\"Sam\"\" Rao\""), "csv: {text}");
    assert!(text.contains("\"Not replied\""));
  }

  #[test]
  fn reparsing_recovers_submissions() {
    let input = vec![
      contact("Dr. \"Sam\" Rao", "Admission \"2026\" intake", ContactStatus::New),
      contact("Lena, Jr.", "Hostel, fees", ContactStatus::Replied),
      contact("Tom", "", ContactStatus::Archived),
    ];
    let bytes = render(&input).unwrap();

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), HEADERS.to_vec());

    let parsed: BTreeSet<(String, String, String, String)> = reader
      .records()
      .map(|r| {
        let r = r.unwrap();
        (r[0].to_owned(), r[1].to_owned(), r[3].to_owned(), r[5].to_owned())
      })
      .collect();
    let expected: BTreeSet<_> = input
      .iter()
      .map(|c| (c.name.clone(), c.email.clone(), c.subject.clone(), c.status.to_string()))
      .collect();
    assert_eq!(parsed, expected);
  }

  #[test]
  fn empty_list_is_header_only() {
    let bytes = render(&[]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 1);
  }
}
