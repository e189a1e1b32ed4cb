//! Product records — the rows the conversion pipeline reads and annotates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product row retrieved from the relational store.
///
/// `color_id` and `size_id` start unset and are filled in by the conversion
/// pipeline. Between retrieval and registration the caller owns the value;
/// the engine only ever borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  pub record_id:       String,
  pub display_name:    String,
  pub color_name:      Option<String>,
  pub size_name:       Option<String>,
  /// A single field encoding both attributes, e.g. `"レッド/M"`.
  pub composite_value: Option<String>,
  pub color_id:        Option<i64>,
  pub size_id:         Option<i64>,
  pub created_at:      Option<DateTime<Utc>>,
  pub updated_at:      Option<DateTime<Utc>>,
}

impl Product {
  /// Bare record with only the identifying fields set.
  pub fn new(record_id: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self {
      record_id:       record_id.into(),
      display_name:    display_name.into(),
      color_name:      None,
      size_name:       None,
      composite_value: None,
      color_id:        None,
      size_id:         None,
      created_at:      None,
      updated_at:      None,
    }
  }
}

// ─── ProductFilter ───────────────────────────────────────────────────────────

/// Parameters for [`crate::store::ConversionStore::list_products`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
  /// LIKE pattern over `display_name`; `*` is accepted as a wildcard.
  pub display_name_pattern: Option<String>,
  pub color_name_pattern:   Option<String>,
  pub size_name_pattern:    Option<String>,
  /// `Some(true)`: only rows with a resolved color; `Some(false)`: only
  /// unresolved rows.
  pub has_color_id:         Option<bool>,
  pub has_size_id:          Option<bool>,
  pub created_after:        Option<DateTime<Utc>>,
  pub created_before:       Option<DateTime<Utc>>,
  pub limit:                Option<usize>,
  pub offset:               Option<usize>,
}
