//! Handlers for lead analytics and downloadable reports.
//!
//! Both endpoints accept the same optional filters:
//! `startDate`, `endDate`, `subject` and `status`.

use std::{str::FromStr, sync::Arc};

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use campus_core::{
  analytics::{LeadsAnalytics, aggregate},
  contact::ContactSubmission,
  filter::LeadFilter,
  store::ContactStore,
};
use campus_report::ReportFormat;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, error::ApiError, extract::ApiQuery};

/// Raw filter values as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadParams {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
  pub status:     Option<String>,
}

impl LeadParams {
  pub fn filter(&self) -> Result<LeadFilter, ApiError> {
    Ok(LeadFilter::parse(
      self.start_date.as_deref(),
      self.end_date.as_deref(),
      self.subject.as_deref(),
      self.status.as_deref(),
    )?)
  }
}

async fn matching<S>(store: &S, filter: &LeadFilter) -> Result<Vec<ContactSubmission>, ApiError>
where
  S: ContactStore,
{
  store.list_contacts(filter, None).await.map_err(ApiError::store)
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyticsBody {
  pub contacts:  Vec<ContactSubmission>,
  pub analytics: LeadsAnalytics,
  pub filters:   LeadFilter,
  pub total:     usize,
}

/// `GET /contact/leads-analytics`
pub async fn analytics<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<LeadParams>,
) -> Result<Json<ApiResponse<AnalyticsBody>>, ApiError>
where
  S: ContactStore,
{
  let filter = params.filter()?;
  let contacts = matching(store.as_ref(), &filter).await?;
  let analytics = aggregate(&contacts, Utc::now());
  tracing::debug!(total = contacts.len(), filter = %filter.describe(), "lead analytics");

  Ok(Json(ApiResponse::ok(AnalyticsBody {
    total: contacts.len(),
    contacts,
    analytics,
    filters: filter,
  })))
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
  pub format:     Option<String>,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
  pub status:     Option<String>,
}

impl ReportParams {
  fn format(&self) -> Result<ReportFormat, ApiError> {
    match self.format.as_deref().map(str::trim) {
      None | Some("") => Ok(ReportFormat::Csv),
      Some(raw) => ReportFormat::from_str(&raw.to_lowercase()).map_err(|_| {
        ApiError::BadRequest(format!(
          "unsupported report format {raw:?}; expected csv, xlsx or pdf"
        ))
      }),
    }
  }

  fn lead(&self) -> LeadParams {
    LeadParams {
      start_date: self.start_date.clone(),
      end_date:   self.end_date.clone(),
      subject:    self.subject.clone(),
      status:     self.status.clone(),
    }
  }
}

/// `GET /contact/leads-report?format=csv|xlsx|pdf`. Returns the file as an
/// attachment.
pub async fn report<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ReportParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let format = params.format()?;
  let filter = params.lead().filter()?;
  let contacts = matching(store.as_ref(), &filter).await?;

  let rows = contacts.len();
  // Spreadsheet and PDF encoding is CPU-bound.
  let report = tokio::task::spawn_blocking(move || {
    campus_report::render(format, &contacts, &filter, Utc::now())
  })
  .await
  .map_err(ApiError::store)??;
  tracing::info!(
    file = %report.file_name,
    rows,
    bytes = report.bytes.len(),
    "lead report generated"
  );

  let disposition = format!("attachment; filename=\"{}\"", report.file_name);
  Ok((
    [
      (header::CONTENT_TYPE, report.content_type.to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    report.bytes,
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn report_params(format: Option<&str>) -> ReportParams {
    ReportParams {
      format:     format.map(Into::into),
      start_date: None,
      end_date:   None,
      subject:    None,
      status:     None,
    }
  }

  #[test]
  fn format_defaults_to_csv() {
    assert_eq!(report_params(None).format().unwrap(), ReportFormat::Csv);
    assert_eq!(report_params(Some("")).format().unwrap(), ReportFormat::Csv);
  }

  #[test]
  fn format_is_case_insensitive() {
    assert_eq!(report_params(Some("PDF")).format().unwrap(), ReportFormat::Pdf);
  }

  #[test]
  fn unknown_format_is_rejected() {
    assert!(matches!(
      report_params(Some("docx")).format(),
      Err(ApiError::BadRequest(_))
    ));
  }

  #[test]
  fn blank_params_mean_no_filter() {
    let params = LeadParams {
      start_date: Some(String::new()),
      subject: Some("  ".into()),
      ..Default::default()
    };
    assert!(params.filter().unwrap().is_empty());
  }
}
