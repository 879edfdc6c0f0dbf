//! Handlers for `/contact` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/contact` | Public. Body: [`NewContactBody`]; returns 201 |
//! | `GET`    | `/contact` | `?page&limit&status&subject&startDate&endDate` |
//! | `GET`    | `/contact/:id` | Marks a `new` submission `read` |
//! | `PATCH`  | `/contact/:id/status` | Body: `{"status":"replied"}` |
//! | `PATCH`  | `/contact/:id/notes` | Body: `{"adminNotes":"..."}` |
//! | `POST`   | `/contact/:id/reply` | Body: `{"message":"..."}` |
//! | `DELETE` | `/contact/:id` | 404 if not found |

use std::{str::FromStr, sync::Arc};

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use campus_core::{
  contact::{ContactStatus, ContactSubmission, NewContact},
  store::{ContactStore, Page},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  ApiResponse,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
  leads::LeadParams,
};

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("contact {id} not found")) }

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /contact`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewContactBody {
  #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
  pub name:    String,
  #[validate(email(message = "Please provide a valid email address"))]
  pub email:   String,
  #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
  pub phone:   Option<String>,
  #[validate(length(min = 1, max = 200, message = "Subject must be between 1 and 200 characters"))]
  pub subject: String,
  #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
  pub message: String,
}

impl NewContactBody {
  /// Trim every field; a blank phone number counts as absent.
  fn trimmed(self) -> Self {
    Self {
      name:    self.name.trim().to_owned(),
      email:   self.email.trim().to_owned(),
      phone:   self
        .phone
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty()),
      subject: self.subject.trim().to_owned(),
      message: self.message.trim().to_owned(),
    }
  }
}

impl From<NewContactBody> for NewContact {
  fn from(b: NewContactBody) -> Self {
    NewContact {
      name:    b.name,
      email:   b.email,
      phone:   b.phone,
      subject: b.subject,
      message: b.message,
    }
  }
}

/// `POST /contact`: returns 201 with the stored submission.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let body = body.trimmed();
  body.validate()?;

  let contact = store
    .create_contact(NewContact::from(body))
    .await
    .map_err(ApiError::store)?;
  tracing::info!(contact = %contact.id, "contact form submitted");

  Ok((
    StatusCode::CREATED,
    Json(ApiResponse::with_message(
      "Thank you for contacting us. We will get back to you soon.",
      contact,
    )),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `serde_urlencoded` cannot deserialize numbers through `#[serde(flatten)]`,
/// so the lead filter fields are repeated here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub page:       Option<usize>,
  pub limit:      Option<usize>,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
  pub status:     Option<String>,
}

impl ListParams {
  fn lead(&self) -> LeadParams {
    LeadParams {
      start_date: self.start_date.clone(),
      end_date:   self.end_date.clone(),
      subject:    self.subject.clone(),
      status:     self.status.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
  pub page:  usize,
  pub limit: usize,
  pub total: usize,
  pub pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ContactPage {
  pub contacts:   Vec<ContactSubmission>,
  pub pagination: Pagination,
}

/// `GET /contact[?page=..][&limit=..][&status=..][&subject=..][&startDate=..][&endDate=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ApiResponse<ContactPage>>, ApiError>
where
  S: ContactStore,
{
  let filter = params.lead().filter()?;
  let page = Page::new(params.page, params.limit);

  let total = store.count_contacts(&filter).await.map_err(ApiError::store)?;
  let contacts = store
    .list_contacts(&filter, Some(page))
    .await
    .map_err(ApiError::store)?;

  Ok(Json(ApiResponse::ok(ContactPage {
    contacts,
    pagination: Pagination {
      page: page.page,
      limit: page.limit,
      total,
      pages: page.page_count(total),
    },
  })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contact/:id`. Opening a `new` submission marks it `read`.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<ContactSubmission>>, ApiError>
where
  S: ContactStore,
{
  let mut contact = store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  if contact.mark_viewed() {
    contact = store
      .set_status(id, contact.status)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| not_found(id))?;
  }

  Ok(Json(ApiResponse::ok(contact)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PATCH /contact/:id/status`, body: `{"status":"replied"}`
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<ApiResponse<ContactSubmission>>, ApiError>
where
  S: ContactStore,
{
  let status = ContactStatus::from_str(body.status.trim())
    .map_err(|_| campus_core::Error::UnknownStatus(body.status.clone()))?;

  let contact = store
    .set_status(id, status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  Ok(Json(ApiResponse::with_message("Status updated", contact)))
}

// ─── Notes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NotesBody {
  #[serde(rename = "adminNotes", default)]
  pub admin_notes: Option<String>,
}

/// `PATCH /contact/:id/notes`, body: `{"adminNotes":"..."}`; blank clears.
pub async fn update_notes<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<NotesBody>,
) -> Result<Json<ApiResponse<ContactSubmission>>, ApiError>
where
  S: ContactStore,
{
  let notes = body
    .admin_notes
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty());

  let contact = store
    .set_admin_notes(id, notes)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  Ok(Json(ApiResponse::with_message("Notes updated", contact)))
}

// ─── Reply ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
  pub message: String,
}

/// `POST /contact/:id/reply`. Records that the lead was answered.
///
/// Outbound mail is not sent from here; the reply is logged and the
/// submission moves to `replied`.
pub async fn reply<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<ReplyBody>,
) -> Result<Json<ApiResponse<ContactSubmission>>, ApiError>
where
  S: ContactStore,
{
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("reply message must not be empty".to_owned()));
  }

  let contact = store
    .set_status(id, ContactStatus::Replied)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  tracing::info!(
    contact = %id,
    to = %contact.email,
    chars = body.message.chars().count(),
    "reply recorded"
  );

  Ok(Json(ApiResponse::with_message("Reply recorded", contact)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contact/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError>
where
  S: ContactStore,
{
  let deleted = store.delete_contact(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(not_found(id));
  }
  Ok(Json(ApiResponse::with_message("Contact deleted", ())))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body(name: &str, email: &str, phone: Option<&str>) -> NewContactBody {
    NewContactBody {
      name:    name.into(),
      email:   email.into(),
      phone:   phone.map(Into::into),
      subject: "  Fees  ".into(),
      message: "How much is tuition?".into(),
    }
  }

  #[test]
  fn trimming_normalises_fields() {
    let b = body("  Anu ", " anu@example.com ", Some("   ")).trimmed();
    assert_eq!(b.name, "Anu");
    assert_eq!(b.email, "anu@example.com");
    assert_eq!(b.subject, "Fees");
    assert!(b.phone.is_none());
    assert!(b.validate().is_ok());
  }

  #[test]
  fn invalid_email_fails_validation() {
    assert!(body("Anu", "not-an-email", None).trimmed().validate().is_err());
  }

  #[test]
  fn blank_name_fails_validation() {
    assert!(body("   ", "anu@example.com", None).trimmed().validate().is_err());
  }

  #[test]
  fn long_phone_fails_validation() {
    let b = body("Anu", "anu@example.com", Some("0123456789012345678901234"));
    assert!(b.trimmed().validate().is_err());
  }
}
