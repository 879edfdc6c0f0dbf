//! Error types for `campus-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid {field}: {value:?} is not a valid date")]
  InvalidDate { field: &'static str, value: String },

  #[error("startDate must not be after endDate")]
  InvertedDateRange,

  #[error("unknown status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
