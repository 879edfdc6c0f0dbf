//! Landscape A4 PDF rendering with a summary header and paginated table.

use std::ops::Range;

use campus_core::{analytics::LeadsAnalytics, contact::ContactSubmission, filter::LeadFilter};
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{
  Error, Result,
  table::{NOT_REPLIED, REPORT_TITLE, format_timestamp, truncate},
};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.0;
/// Lowest baseline a table row may use; the footer sits below it.
const TABLE_BOTTOM: f32 = 18.0;
/// Baseline of the column headings on the first page, below the summary block.
const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - 48.0;
/// Baseline of the column headings on continuation pages.
const NEXT_TABLE_TOP: f32 = PAGE_HEIGHT - 16.0;

struct Column {
  title:     &'static str,
  x:         f32,
  max_chars: usize,
}

const COLUMNS: [Column; 8] = [
  Column { title: "Name", x: MARGIN, max_chars: 24 },
  Column { title: "Email", x: 50.0, max_chars: 30 },
  Column { title: "Phone", x: 100.0, max_chars: 16 },
  Column { title: "Subject", x: 128.0, max_chars: 30 },
  Column { title: "Status", x: 184.0, max_chars: 10 },
  Column { title: "Priority", x: 204.0, max_chars: 8 },
  Column { title: "Submitted", x: 226.0, max_chars: 12 },
  Column { title: "Replied", x: 254.0, max_chars: 12 },
];

/// How many rows fit below a heading line at `top`.
fn capacity(top: f32) -> usize { ((top - TABLE_BOTTOM) / ROW_HEIGHT).floor() as usize }

/// Split `rows` into per-page index ranges. Always yields at least one page.
pub(crate) fn paginate(rows: usize) -> Vec<Range<usize>> {
  let first = capacity(FIRST_TABLE_TOP);
  let next = capacity(NEXT_TABLE_TOP);

  let mut pages = vec![0..rows.min(first)];
  let mut start = rows.min(first);
  while start < rows {
    let end = (start + next).min(rows);
    pages.push(start..end);
    start = end;
  }
  pages
}

fn cells(c: &ContactSubmission) -> [String; 8] {
  let day = |at: DateTime<Utc>| at.format("%Y-%m-%d").to_string();
  [
    c.name.clone(),
    c.email.clone(),
    c.phone.clone().unwrap_or_default(),
    c.subject.clone(),
    c.status.to_string(),
    c.priority().label().to_owned(),
    day(c.submitted_at),
    c.replied_at.map(day).unwrap_or_else(|| NOT_REPLIED.to_owned()),
  ]
}

fn pdf_err(e: impl std::fmt::Display) -> Error { Error::Pdf(e.to_string()) }

struct Fonts {
  regular: IndirectFontRef,
  bold:    IndirectFontRef,
}

fn draw_column_headings(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
  for col in &COLUMNS {
    layer.use_text(col.title, 9.0, Mm(col.x), Mm(y), &fonts.bold);
  }
}

pub fn render(
  contacts: &[ContactSubmission],
  filter: &LeadFilter,
  analytics: &LeadsAnalytics,
  generated_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
  let (doc, first_page, first_layer) =
    PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
  // The base-14 Helvetica faces only cover WinAnsi (roughly Latin-1). Names or
  // subjects in other scripts come out as missing glyphs; embed a TTF through
  // `add_external_font` if the report must carry them.
  let fonts = Fonts {
    regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
    bold:    doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
  };

  let pages = paginate(contacts.len());
  let page_count = pages.len();

  for (index, range) in pages.into_iter().enumerate() {
    let layer = if index == 0 {
      doc.get_page(first_page).get_layer(first_layer)
    } else {
      let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
      doc.get_page(page).get_layer(layer)
    };

    let top = if index == 0 {
      let mut y = PAGE_HEIGHT - 16.0;
      layer.use_text(REPORT_TITLE, 16.0, Mm(MARGIN), Mm(y), &fonts.bold);
      y -= 8.0;
      layer.use_text(
        format!("Generated: {}", format_timestamp(generated_at)),
        9.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
      );
      y -= 5.0;
      layer.use_text(
        format!("Filters: {}", filter.describe()),
        9.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
      );
      y -= 7.0;
      let b = &analytics.priority_breakdown;
      layer.use_text(
        format!(
          "Total leads: {}   High: {}   Medium: {}   Low: {}   Response rate: {}%   Conversion rate: {}%",
          analytics.total_leads,
          b.high,
          b.medium,
          b.low,
          analytics.response_rate,
          analytics.conversion_rate,
        ),
        10.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.bold,
      );
      FIRST_TABLE_TOP
    } else {
      NEXT_TABLE_TOP
    };

    draw_column_headings(&layer, &fonts, top);

    if contacts.is_empty() {
      layer.use_text(
        "No leads match the selected filters.",
        9.0,
        Mm(MARGIN),
        Mm(top - ROW_HEIGHT),
        &fonts.regular,
      );
    }

    for (offset, contact) in contacts[range].iter().enumerate() {
      let y = top - ROW_HEIGHT * (offset as f32 + 1.0);
      for (col, text) in COLUMNS.iter().zip(cells(contact)) {
        layer.use_text(truncate(&text, col.max_chars), 8.0, Mm(col.x), Mm(y), &fonts.regular);
      }
    }

    layer.use_text(
      format!("Page {} of {page_count}", index + 1),
      8.0,
      Mm(PAGE_WIDTH / 2.0 - 10.0),
      Mm(8.0),
      &fonts.regular,
    );
  }

  doc.save_to_bytes().map_err(pdf_err)
}
