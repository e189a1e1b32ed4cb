//! Handlers for `/convert` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use weft_core::{
  batch::ConversionResult,
  product::Product,
  resolve::CompositeMatch,
  store::ConversionStore,
};
use weft_engine::{BatchOptions, ErrorCollector};

use crate::error::ApiError;

// ─── Batch conversion ────────────────────────────────────────────────────────

fn default_true() -> bool { true }

fn default_threshold() -> f64 { 0.5 }

/// JSON body accepted by `POST /convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
  pub products: Vec<Product>,
  #[serde(default = "default_true")]
  pub convert_colors: bool,
  #[serde(default = "default_true")]
  pub convert_sizes: bool,
  #[serde(default = "default_threshold")]
  pub confidence_threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
  pub results: Vec<ConversionResult>,
  /// Per-record processing faults collected during the run. Sub-threshold
  /// outcomes are not faults; look at each result's status for those.
  pub errors:  Vec<String>,
}

/// `POST /convert` — run a conversion batch over the supplied products.
pub async fn run<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let options = BatchOptions {
    convert_colors:       body.convert_colors,
    convert_sizes:        body.convert_sizes,
    confidence_threshold: body.confidence_threshold,
  };

  let mut collector = ErrorCollector::new();
  let results =
    weft_engine::run_batch(store.as_ref(), &body.products, &options, &mut collector).await?;

  Ok(Json(ConvertResponse {
    results,
    errors: collector.messages(),
  }))
}

// ─── Composite resolution ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompositeParams {
  pub value: String,
}

/// `GET /convert/composite?value=<combined color/size string>`
pub async fn composite<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CompositeParams>,
) -> Result<Json<CompositeMatch>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let matched = weft_engine::resolve_composite_value(store.as_ref(), &params.value).await?;
  Ok(Json(matched))
}
