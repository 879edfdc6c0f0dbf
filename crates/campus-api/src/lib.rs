//! JSON REST API for the campus lead desk.
//!
//! Exposes two axum [`Router`]s backed by any
//! [`campus_core::store::ContactStore`]: the public contact form and the
//! admin lead desk. Authentication, TLS and transport concerns are the
//! caller's responsibility; the server crate gates [`admin_router`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let api = campus_api::admin_router(store.clone())
//!   .route_layer(auth_layer)
//!   .merge(campus_api::public_router(store));
//! Router::new().nest("/api", api)
//! ```

pub mod contacts;
pub mod error;
pub mod extract;
pub mod leads;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use campus_core::store::ContactStore;
use serde::Serialize;

pub use error::ApiError;

/// Envelope wrapped around every successful response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  pub data:    T,
}

impl<T> ApiResponse<T> {
  pub fn ok(data: T) -> Self { Self { success: true, message: None, data } }

  pub fn with_message(message: impl Into<String>, data: T) -> Self {
    Self { success: true, message: Some(message.into()), data }
  }
}

/// Routes open to site visitors.
pub fn public_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + Send + Sync + 'static,
{
  Router::new()
    .route("/contact", post(contacts::create::<S>))
    .with_state(store)
}

/// Lead-desk routes for administrators.
///
/// The returned `Router<()>` can be layered and merged with
/// [`public_router`] regardless of the parent's state type.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + Send + Sync + 'static,
{
  Router::new()
    .route("/contact", get(contacts::list::<S>))
    .route("/contact/leads-analytics", get(leads::analytics::<S>))
    .route("/contact/leads-report", get(leads::report::<S>))
    .route(
      "/contact/{id}",
      get(contacts::get_one::<S>).delete(contacts::delete_one::<S>),
    )
    .route("/contact/{id}/status", patch(contacts::update_status::<S>))
    .route("/contact/{id}/notes", patch(contacts::update_notes::<S>))
    .route("/contact/{id}/reply", post(contacts::reply::<S>))
    .with_state(store)
}
