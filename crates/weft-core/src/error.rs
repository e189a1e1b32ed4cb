//! Error types for `weft-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("rule source name must not be empty")]
  EmptySourceName,

  #[error("confidence {0} is outside the [0, 1] range")]
  ConfidenceOutOfRange(f64),

  #[error("unknown domain: {0:?}")]
  UnknownDomain(String),

  #[error("unknown conversion kind: {0:?}")]
  UnknownKind(String),

  #[error("unknown conversion status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
