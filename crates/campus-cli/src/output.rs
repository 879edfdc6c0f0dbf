//! Plain-text rendering of API responses for the terminal.

use std::fmt::Write as _;

use campus_core::{analytics::LeadsAnalytics, contact::ContactSubmission};
use chrono::{DateTime, Local, Utc};

use crate::client::{AnalyticsReport, ContactPage};

fn local(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
fn clip(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_owned();
  }
  let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
  out.push('…');
  out
}

pub fn contact_page(page: &ContactPage) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<36}  {:<8}  {:<6}  {:<16}  {:<20}  SUBJECT",
    "ID", "STATUS", "PRIO", "SUBMITTED", "NAME"
  );
  for c in &page.contacts {
    let _ = writeln!(
      out,
      "{:<36}  {:<8}  {:<6}  {:<16}  {:<20}  {}",
      c.id,
      c.status,
      c.priority().label(),
      local(c.submitted_at),
      clip(&c.name, 20),
      clip(&c.subject, 40),
    );
  }
  let p = &page.pagination;
  let _ = writeln!(
    out,
    "\npage {}/{} ({} per page, {} total)",
    p.page,
    p.pages.max(1),
    p.limit,
    p.total
  );
  out
}

pub fn contact(c: &ContactSubmission) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "ID:        {}", c.id);
  let _ = writeln!(out, "Name:      {}", c.name);
  let _ = writeln!(out, "Email:     {}", c.email);
  if let Some(phone) = &c.phone {
    let _ = writeln!(out, "Phone:     {phone}");
  }
  let _ = writeln!(out, "Subject:   {}", c.subject);
  let _ = writeln!(out, "Status:    {}", c.status);
  let _ = writeln!(out, "Priority:  {}", c.priority().label());
  let _ = writeln!(out, "Submitted: {}", local(c.submitted_at));
  if let Some(at) = c.replied_at {
    let _ = writeln!(out, "Replied:   {}", local(at));
  }
  if let Some(notes) = &c.admin_notes {
    let _ = writeln!(out, "Notes:     {notes}");
  }
  let _ = writeln!(out, "\n{}", c.message);
  out
}

fn breakdown(a: &LeadsAnalytics) -> String {
  let s = &a.status_breakdown;
  let p = &a.priority_breakdown;
  let t = &a.subject_analysis;
  format!(
    "Status:    new {}  read {}  replied {}  archived {}\n\
     Priority:  high {}  medium {}  low {}\n\
     Topics:    admissions {}  courses {}  financial {}  placement {}  general {}\n",
    s.new, s.read, s.replied, s.archived,
    p.high, p.medium, p.low,
    t.admissions, t.courses, t.financial, t.placement, t.general,
  )
}

pub fn analytics(report: &AnalyticsReport) -> String {
  let a = &report.analytics;
  let mut out = String::new();
  let _ = writeln!(out, "Filters:   {}", report.filters.describe());
  let _ = writeln!(out, "Leads:     {} total", report.total);
  let _ = writeln!(
    out,
    "This week: {} (previous {}, growth {}%)",
    a.recent_leads, a.previous_week_leads, a.growth
  );
  let _ = writeln!(
    out,
    "Potential students: {} (conversion {}%)",
    a.potential_students, a.conversion_rate
  );
  let _ = writeln!(out, "Response rate: {}%", a.response_rate);
  out.push_str(&breakdown(a));
  out
}
