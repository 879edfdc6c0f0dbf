//! Error types for the report renderers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  #[error("pdf error: {0}")]
  Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
