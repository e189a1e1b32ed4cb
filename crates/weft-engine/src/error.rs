//! Error type for `weft-engine`.

use thiserror::Error;

/// An error surfaced by the engine.
///
/// Per-record conversion outcomes (sub-threshold confidence, missing
/// rules) are never errors — they are `failed` statuses in the results
/// and history. This type covers the faults that stop an operation.
#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("validation failed: {0}")]
  Validation(String),
}

impl Error {
  /// Box a backend-specific store error at the engine boundary.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
