//! Handler for the `/products` endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use weft_core::{
  product::{Product, ProductFilter},
  store::ConversionStore,
};

use crate::error::ApiError;

/// `GET /products` — all [`ProductFilter`] fields are accepted as query
/// parameters, e.g. `?has_color_id=false&display_name_pattern=*tee*`.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let products = store
    .list_products(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(products))
}
