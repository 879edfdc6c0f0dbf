//! HTTP server for the campus lead desk.
//!
//! Mounts [`campus_api`] under `/api`, gating the admin routes with HTTP
//! Basic auth, and wraps everything in a request-tracing layer.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use campus_core::store::ContactStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_admin};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/campus/leads.db") }

/// Runtime server configuration, deserialised from `config.toml` and
/// `CAMPUS_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.admin_username.clone(),
      password_hash: self.admin_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState<S: ContactStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Send + Sync + 'static,
{
  let api = campus_api::admin_router(state.store.clone())
    .route_layer(middleware::from_fn_with_state(state.auth.clone(), require_admin))
    .merge(campus_api::public_router(state.store));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
