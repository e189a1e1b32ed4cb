//! Handlers for `/register` and `/assignments` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use weft_core::{
  batch::{Assignment, BatchResult},
  product::Product,
  rule::Domain,
  store::ConversionStore,
};
use weft_engine::{RegisterOptions, ValidationReport};

use crate::error::ApiError;

fn default_true() -> bool { true }

// ─── Registration ────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /register` and `POST /register/validate`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
  pub products: Vec<Product>,
  #[serde(default = "default_true")]
  pub write_colors: bool,
  #[serde(default = "default_true")]
  pub write_sizes: bool,
}

/// `POST /register` — upsert resolved assignments into the target tables.
pub async fn run<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterRequest>,
) -> Result<Json<BatchResult>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let options = RegisterOptions {
    write_colors: body.write_colors,
    write_sizes:  body.write_sizes,
  };
  let result = weft_engine::batch_insert(store.as_ref(), &body.products, &options).await;
  Ok(Json(result))
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidationBody {
  pub total:    usize,
  pub valid:    usize,
  pub invalid:  usize,
  pub is_valid: bool,
  pub errors:   Vec<String>,
  pub warnings: Vec<String>,
}

impl From<ValidationReport> for ValidationBody {
  fn from(r: ValidationReport) -> Self {
    Self {
      total:    r.total,
      valid:    r.valid,
      invalid:  r.invalid,
      is_valid: r.is_valid(),
      errors:   r.errors,
      warnings: r.warnings,
    }
  }
}

/// `POST /register/validate` — dry-run check of a batch before writing.
pub async fn validate(Json(body): Json<RegisterRequest>) -> Json<ValidationBody> {
  let report = weft_engine::validate_products(&body.products);
  Json(ValidationBody::from(report))
}

// ─── Assignment inspection ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecentParams {
  pub limit: Option<usize>,
}

/// `GET /assignments/{domain}?limit=<n>` — most recently written rows in a
/// domain's target table.
pub async fn recent<S>(
  State(store): State<Arc<S>>,
  Path(domain): Path<String>,
  Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Assignment>>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain: Domain = domain
    .parse()
    .map_err(|e: weft_core::Error| ApiError::BadRequest(e.to_string()))?;
  let rows = store
    .list_recent_assignments(domain, params.limit.unwrap_or(5))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
