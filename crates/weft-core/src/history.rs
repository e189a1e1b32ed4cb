//! Conversion history — the append-only trace of every conversion attempt.
//!
//! One row is written per record per batch run, success or failure. Rows
//! are never updated or deleted; the history table is the durable audit of
//! what the engine decided and why.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a conversion was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
  /// Resolved by the batch engine from the separate name fields.
  Auto,
  /// Applied by an operator through the maintenance surface.
  Manual,
  /// Resolved from a combined color/size value.
  Composite,
}

/// Outcome of a single conversion attempt.
///
/// `Failed` covers sub-threshold confidence and missing rules as well as
/// storage faults; none of these abort a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
  Success,
  Failed,
}

// ─── ConversionHistory ───────────────────────────────────────────────────────

/// One row of the append-only conversion trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionHistory {
  pub id:                i64,
  pub record_id:         String,
  /// The free-text input as it was at conversion time.
  pub original_value:    String,
  pub resolved_color_id: Option<i64>,
  pub resolved_size_id:  Option<i64>,
  pub kind:              ConversionKind,
  pub status:            ConversionStatus,
  pub confidence:        f64,
  pub error_message:     Option<String>,
  /// Server-assigned; never changes after the append.
  pub created_at:        DateTime<Utc>,
}

// ─── NewHistory ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ConversionStore::record_history`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewHistory {
  pub record_id:         String,
  pub original_value:    String,
  pub resolved_color_id: Option<i64>,
  pub resolved_size_id:  Option<i64>,
  pub kind:              ConversionKind,
  pub status:            ConversionStatus,
  pub confidence:        f64,
  pub error_message:     Option<String>,
}
