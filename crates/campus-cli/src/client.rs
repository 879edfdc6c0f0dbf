//! Async HTTP client wrapping the campus lead API.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use campus_core::{analytics::LeadsAnalytics, contact::ContactSubmission, filter::LeadFilter};
use reqwest::{Client, Response, header};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use uuid::Uuid;

/// Connection settings for the campus API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Filter values forwarded verbatim as query parameters.
#[derive(Debug, Clone, Default)]
pub struct LeadQuery {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
  pub status:     Option<String>,
}

impl LeadQuery {
  fn pairs(&self) -> Vec<(&'static str, String)> {
    [
      ("startDate", &self.start_date),
      ("endDate", &self.end_date),
      ("subject", &self.subject),
      ("status", &self.status),
    ]
    .into_iter()
    .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
    .collect()
  }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
  data: T,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
  pub page:  usize,
  pub limit: usize,
  pub total: usize,
  pub pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct ContactPage {
  pub contacts:   Vec<ContactSubmission>,
  pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsReport {
  pub analytics: LeadsAnalytics,
  pub filters:   LeadFilter,
  pub total:     usize,
}

/// Async HTTP client for the campus JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Fail on non-2xx, surfacing the server's `message` when there is one.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
      .ok()
      .and_then(|v| v["message"].as_str().map(str::to_owned))
      .unwrap_or(body);
    if message.is_empty() {
      Err(anyhow!("{what} → {status}"))
    } else {
      Err(anyhow!("{what} → {status}: {message}"))
    }
  }

  async fn data<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let resp = Self::check(resp, what).await?;
    let envelope: Envelope<T> = resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))?;
    Ok(envelope.data)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  /// `GET /api/contact?page=..&limit=..[&filters]`
  pub async fn list(&self, page: usize, limit: usize, filter: &LeadQuery) -> Result<ContactPage> {
    let mut query = filter.pairs();
    query.push(("page", page.to_string()));
    query.push(("limit", limit.to_string()));

    let resp = self
      .auth(self.client.get(self.url("/contact")))
      .query(&query)
      .send()
      .await
      .context("GET /contact failed")?;
    Self::data(resp, "GET /contact").await
  }

  /// `GET /api/contact/<id>`
  pub async fn get(&self, id: Uuid) -> Result<ContactSubmission> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/contact/{id}"))))
      .send()
      .await
      .context("GET /contact/<id> failed")?;
    Self::data(resp, "GET /contact/<id>").await
  }

  /// `PATCH /api/contact/<id>/status`
  pub async fn set_status(&self, id: Uuid, status: &str) -> Result<ContactSubmission> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/contact/{id}/status"))))
      .json(&json!({ "status": status }))
      .send()
      .await
      .context("PATCH /contact/<id>/status failed")?;
    Self::data(resp, "PATCH /contact/<id>/status").await
  }

  /// `PATCH /api/contact/<id>/notes`
  pub async fn set_notes(&self, id: Uuid, notes: &str) -> Result<ContactSubmission> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/contact/{id}/notes"))))
      .json(&json!({ "adminNotes": notes }))
      .send()
      .await
      .context("PATCH /contact/<id>/notes failed")?;
    Self::data(resp, "PATCH /contact/<id>/notes").await
  }

  /// `POST /api/contact/<id>/reply`
  pub async fn reply(&self, id: Uuid, message: &str) -> Result<ContactSubmission> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/contact/{id}/reply"))))
      .json(&json!({ "message": message }))
      .send()
      .await
      .context("POST /contact/<id>/reply failed")?;
    Self::data(resp, "POST /contact/<id>/reply").await
  }

  /// `DELETE /api/contact/<id>`
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/contact/{id}"))))
      .send()
      .await
      .context("DELETE /contact/<id> failed")?;
    Self::check(resp, "DELETE /contact/<id>").await?;
    Ok(())
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/contact/leads-analytics[?filters]`
  pub async fn analytics(&self, filter: &LeadQuery) -> Result<AnalyticsReport> {
    let resp = self
      .auth(self.client.get(self.url("/contact/leads-analytics")))
      .query(&filter.pairs())
      .send()
      .await
      .context("GET /contact/leads-analytics failed")?;
    Self::data(resp, "GET /contact/leads-analytics").await
  }

  /// `GET /api/contact/leads-report?format=..`. Saves the attachment under
  /// `out_dir` using the server-provided file name and returns its path.
  pub async fn export(
    &self,
    format: &str,
    filter: &LeadQuery,
    out_dir: &Path,
  ) -> Result<std::path::PathBuf> {
    let mut query = filter.pairs();
    query.push(("format", format.to_owned()));

    let resp = self
      .auth(self.client.get(self.url("/contact/leads-report")))
      .query(&query)
      .send()
      .await
      .context("GET /contact/leads-report failed")?;
    let resp = Self::check(resp, "GET /contact/leads-report").await?;

    let file_name = resp
      .headers()
      .get(header::CONTENT_DISPOSITION)
      .and_then(|v| v.to_str().ok())
      .and_then(attachment_name)
      .unwrap_or_else(|| format!("student-leads-report.{format}"));

    let bytes = resp.bytes().await.context("reading report body")?;
    let path = out_dir.join(file_name);
    tokio::fs::write(&path, &bytes)
      .await
      .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "report saved");
    Ok(path)
  }
}

/// Pull `filename="..."` out of a `Content-Disposition` value. Path
/// separators are rejected so the server cannot write outside `out_dir`.
pub fn attachment_name(disposition: &str) -> Option<String> {
  let raw = disposition
    .split(';')
    .map(str::trim)
    .find_map(|part| part.strip_prefix("filename="))?;
  let name = raw.trim_matches('"');
  if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
    return None;
  }
  Some(name.to_owned())
}
