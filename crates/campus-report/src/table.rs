//! Row and summary layout shared by every report format.

use campus_core::{
  analytics::LeadsAnalytics,
  classify::Priority,
  contact::{ContactStatus, ContactSubmission},
  filter::LeadFilter,
};
use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;

pub const REPORT_TITLE: &str = "Student Leads Report";

/// Shown in the replied column for leads never answered.
pub const NOT_REPLIED: &str = "Not replied";

/// Detail columns, in order.
pub const HEADERS: [&str; 10] = [
  "Name",
  "Email",
  "Phone",
  "Subject",
  "Message",
  "Status",
  "Priority",
  "Submitted Date",
  "Replied Date",
  "Admin Notes",
];

pub fn format_timestamp(at: DateTime<Utc>) -> String {
  at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// One detail row per submission, matching [`HEADERS`].
pub fn detail_row(c: &ContactSubmission) -> [String; 10] {
  [
    c.name.clone(),
    c.email.clone(),
    c.phone.clone().unwrap_or_default(),
    c.subject.clone(),
    c.message.clone(),
    c.status.to_string(),
    c.priority().label().to_owned(),
    format_timestamp(c.submitted_at),
    c.replied_at
      .map(format_timestamp)
      .unwrap_or_else(|| NOT_REPLIED.to_owned()),
    c.admin_notes.clone().unwrap_or_default(),
  ]
}

/// Cut `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() > max {
    let head: String = text.chars().take(max).collect();
    format!("{head}...")
  } else {
    text.to_owned()
  }
}

/// A line of the summary sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
  Text(String),
  Count(usize),
  Percent(f64),
  /// Section heading with no value.
  Heading,
  Blank,
}

/// Label/value pairs describing the filters used and the aggregate numbers.
pub fn summary_rows(
  filter: &LeadFilter,
  analytics: &LeadsAnalytics,
  generated_at: DateTime<Utc>,
) -> Vec<(String, SummaryValue)> {
  let text = |v: Option<String>| SummaryValue::Text(v.unwrap_or_else(|| "Any".to_owned()));
  let day = |d: Option<DateTime<Utc>>| d.map(|d| d.format("%Y-%m-%d").to_string());

  let mut rows = vec![
    (REPORT_TITLE.to_owned(), SummaryValue::Heading),
    ("Generated".to_owned(), SummaryValue::Text(format_timestamp(generated_at))),
    ("Filters".to_owned(), SummaryValue::Text(filter.describe())),
    ("Start Date".to_owned(), text(day(filter.date_range.start))),
    ("End Date".to_owned(), text(day(filter.date_range.end))),
    ("Subject Contains".to_owned(), text(filter.subject.clone())),
    ("Status".to_owned(), text(filter.status.map(|s| s.to_string()))),
    (String::new(), SummaryValue::Blank),
    ("Total Leads".to_owned(), SummaryValue::Count(analytics.total_leads)),
    ("Potential Students".to_owned(), SummaryValue::Count(analytics.potential_students)),
    ("Conversion Rate (%)".to_owned(), SummaryValue::Percent(analytics.conversion_rate)),
    ("Response Rate (%)".to_owned(), SummaryValue::Percent(analytics.response_rate)),
    (String::new(), SummaryValue::Blank),
    ("Priority Breakdown".to_owned(), SummaryValue::Heading),
  ];
  for p in Priority::iter() {
    rows.push((
      format!("{} Priority", p.label()),
      SummaryValue::Count(analytics.priority_breakdown.get(p)),
    ));
  }
  rows.push((String::new(), SummaryValue::Blank));
  rows.push(("Status Breakdown".to_owned(), SummaryValue::Heading));
  for s in ContactStatus::iter() {
    rows.push((capitalise(s.as_ref()), SummaryValue::Count(analytics.status_breakdown.get(s))));
  }
  rows
}

fn capitalise(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
