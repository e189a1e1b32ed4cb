//! Conversion rules — the persisted name→ID mapping tables.
//!
//! A rule maps one free-text source name to a canonical target ID and name,
//! with a confidence expressing how much that mapping is trusted. Each
//! domain (color, size) owns an independent rule set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Domain ──────────────────────────────────────────────────────────────────

/// The two independent conversion axes.
///
/// Storage backends map each variant to a fixed table and fixed SQL at
/// compile time; there is no runtime table-name construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
  Color,
  Size,
}

impl Domain {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Color => "color",
      Self::Size => "size",
    }
  }
}

impl std::str::FromStr for Domain {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "color" => Ok(Self::Color),
      "size" => Ok(Self::Size),
      other => Err(Error::UnknownDomain(other.to_string())),
    }
  }
}

impl std::fmt::Display for Domain {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── ConversionRule ──────────────────────────────────────────────────────────

/// A persisted mapping from a free-text source name to a canonical target.
///
/// Rules are soft-deleted by flipping `is_active`; rows are never removed,
/// so history entries keep valid references. Duplicate source names within
/// a domain are tolerated — resolution takes the first match in store
/// order (`source_name` ascending, then insertion id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRule {
  pub id:          i64,
  pub source_name: String,
  pub target_id:   i64,
  pub target_name: String,
  /// Trust in this mapping, in `[0, 1]`.
  pub confidence:  f64,
  pub is_active:   bool,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

// ─── NewRule ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ConversionStore::add_rule`].
/// The row id and timestamps are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRule {
  pub source_name: String,
  pub target_id:   i64,
  pub target_name: String,
  #[serde(default = "default_confidence")]
  pub confidence:  f64,
}

fn default_confidence() -> f64 { 1.0 }

impl NewRule {
  /// Convenience constructor with full confidence.
  pub fn new(
    source_name: impl Into<String>,
    target_id: i64,
    target_name: impl Into<String>,
  ) -> Self {
    Self {
      source_name: source_name.into(),
      target_id,
      target_name: target_name.into(),
      confidence: 1.0,
    }
  }

  pub fn with_confidence(mut self, confidence: f64) -> Self {
    self.confidence = confidence;
    self
  }

  /// Reject malformed rules before anything touches storage.
  pub fn validate(&self) -> Result<()> {
    if self.source_name.trim().is_empty() {
      return Err(Error::EmptySourceName);
    }
    if !(0.0..=1.0).contains(&self.confidence) {
      return Err(Error::ConfidenceOutOfRange(self.confidence));
    }
    Ok(())
  }
}
