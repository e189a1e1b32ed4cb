//! Handler for the `/history` endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use weft_core::{history::ConversionHistory, store::ConversionStore};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /history?limit=<n>` — most recent conversion attempts, newest
/// first. Defaults to 100 rows.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ConversionHistory>>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = store
    .list_history(params.limit.unwrap_or(100))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
