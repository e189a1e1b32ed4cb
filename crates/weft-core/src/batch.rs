//! Transient batch outputs — per-record results and aggregate write reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{ConversionKind, ConversionStatus};

// ─── ConversionResult ────────────────────────────────────────────────────────

/// Per-record outcome of a conversion batch.
///
/// Not persisted — the history table is the durable trace. One result is
/// produced for every record handed to the engine, whatever the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
  pub record_id:           String,
  pub original_color_name: Option<String>,
  pub original_size_name:  Option<String>,
  pub original_composite:  Option<String>,
  pub resolved_color_id:   Option<i64>,
  pub resolved_color_name: Option<String>,
  pub resolved_size_id:    Option<i64>,
  pub resolved_size_name:  Option<String>,
  pub confidence:          f64,
  pub kind:                ConversionKind,
  pub status:              ConversionStatus,
  pub error_message:       Option<String>,
}

// ─── Write reporting ─────────────────────────────────────────────────────────

/// Row counts from one upsert writer call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
  pub inserted: u64,
  /// Records without the relevant resolved ID; counted, never errored.
  pub skipped:  u64,
}

/// A row from one of the assignment target tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
  pub record_id:    String,
  pub display_name: String,
  /// The free-text name as written, e.g. the original color name.
  pub source_name:  Option<String>,
  pub target_id:    i64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Aggregate outcome of a registration run over both target tables.
///
/// The color and size writers run independently; a `None` summary means
/// that writer was disabled or failed (see `errors`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
  pub run_id:       Uuid,
  pub total:        usize,
  pub colors:       Option<WriteSummary>,
  pub sizes:        Option<WriteSummary>,
  pub started_at:   DateTime<Utc>,
  pub completed_at: DateTime<Utc>,
  pub errors:       Vec<String>,
}

impl BatchResult {
  pub fn is_success(&self) -> bool { self.errors.is_empty() }
}
