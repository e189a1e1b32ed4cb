//! Caller-owned error accumulation for a single conversion run.
//!
//! The collector is created by the caller, passed into the run, and read
//! back afterwards. Its lifetime is one batch; nothing is shared or global.

/// One recorded failure.
#[derive(Debug, Clone)]
pub struct CollectedError {
  pub record_id: Option<String>,
  pub message:   String,
}

/// Accumulates per-record failures during a batch without aborting it.
#[derive(Debug, Default)]
pub struct ErrorCollector {
  errors: Vec<CollectedError>,
}

impl ErrorCollector {
  pub fn new() -> Self { Self::default() }

  pub fn record(&mut self, record_id: Option<&str>, message: impl Into<String>) {
    self.errors.push(CollectedError {
      record_id: record_id.map(str::to_owned),
      message:   message.into(),
    });
  }

  pub fn len(&self) -> usize { self.errors.len() }

  pub fn is_empty(&self) -> bool { self.errors.is_empty() }

  pub fn errors(&self) -> &[CollectedError] { &self.errors }

  /// Error strings in insertion order, prefixed with the record id where
  /// one is known.
  pub fn messages(&self) -> Vec<String> {
    self
      .errors
      .iter()
      .map(|e| match &e.record_id {
        Some(id) => format!("{id}: {}", e.message),
        None => e.message.clone(),
      })
      .collect()
  }
}
