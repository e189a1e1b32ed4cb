//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enums are stored as their
//! lowercase discriminant strings. Booleans are stored as 0/1 integers.

use chrono::{DateTime, Utc};
use weft_core::{
  batch::Assignment,
  history::{ConversionHistory, ConversionKind, ConversionStatus},
  product::Product,
  rule::ConversionRule,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ConversionKind ──────────────────────────────────────────────────────────

pub fn encode_kind(k: ConversionKind) -> &'static str {
  match k {
    ConversionKind::Auto => "auto",
    ConversionKind::Manual => "manual",
    ConversionKind::Composite => "composite",
  }
}

pub fn decode_kind(s: &str) -> Result<ConversionKind> {
  match s {
    "auto" => Ok(ConversionKind::Auto),
    "manual" => Ok(ConversionKind::Manual),
    "composite" => Ok(ConversionKind::Composite),
    other => Err(weft_core::Error::UnknownKind(other.to_string()).into()),
  }
}

// ─── ConversionStatus ────────────────────────────────────────────────────────

pub fn encode_status(s: ConversionStatus) -> &'static str {
  match s {
    ConversionStatus::Success => "success",
    ConversionStatus::Failed => "failed",
  }
}

pub fn decode_status(s: &str) -> Result<ConversionStatus> {
  match s {
    "success" => Ok(ConversionStatus::Success),
    "failed" => Ok(ConversionStatus::Failed),
    other => Err(weft_core::Error::UnknownStatus(other.to_string()).into()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a rule-table row.
pub struct RawRule {
  pub id:          i64,
  pub source_name: String,
  pub target_id:   i64,
  pub target_name: String,
  pub confidence:  f64,
  pub is_active:   bool,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawRule {
  pub fn into_rule(self) -> Result<ConversionRule> {
    Ok(ConversionRule {
      id:          self.id,
      source_name: self.source_name,
      target_id:   self.target_id,
      target_name: self.target_name,
      confidence:  self.confidence,
      is_active:   self.is_active,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `products` row.
pub struct RawProduct {
  pub record_id:       String,
  pub display_name:    String,
  pub color_name:      Option<String>,
  pub size_name:       Option<String>,
  pub composite_value: Option<String>,
  pub color_id:        Option<i64>,
  pub size_id:         Option<i64>,
  pub created_at:      Option<String>,
  pub updated_at:      Option<String>,
}

impl RawProduct {
  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      record_id:       self.record_id,
      display_name:    self.display_name,
      color_name:      self.color_name,
      size_name:       self.size_name,
      composite_value: self.composite_value,
      color_id:        self.color_id,
      size_id:         self.size_id,
      created_at:      self.created_at.as_deref().map(decode_dt).transpose()?,
      updated_at:      self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `conversion_history` row.
pub struct RawHistory {
  pub id:                i64,
  pub record_id:         String,
  pub original_value:    String,
  pub resolved_color_id: Option<i64>,
  pub resolved_size_id:  Option<i64>,
  pub kind:              String,
  pub status:            String,
  pub confidence:        f64,
  pub error_message:     Option<String>,
  pub created_at:        String,
}

impl RawHistory {
  pub fn into_history(self) -> Result<ConversionHistory> {
    Ok(ConversionHistory {
      id:                self.id,
      record_id:         self.record_id,
      original_value:    self.original_value,
      resolved_color_id: self.resolved_color_id,
      resolved_size_id:  self.resolved_size_id,
      kind:              decode_kind(&self.kind)?,
      status:            decode_status(&self.status)?,
      confidence:        self.confidence,
      error_message:     self.error_message,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an assignment-table row.
pub struct RawAssignment {
  pub record_id:    String,
  pub display_name: String,
  pub source_name:  Option<String>,
  pub target_id:    i64,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      record_id:    self.record_id,
      display_name: self.display_name,
      source_name:  self.source_name,
      target_id:    self.target_id,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
