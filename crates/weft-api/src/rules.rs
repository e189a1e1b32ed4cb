//! Handlers for `/rules` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/rules/{domain}` | Active rules, resolution order |
//! | `GET`  | `/rules/{domain}/all` | Inactive rules included |
//! | `POST` | `/rules/{domain}` | Body: [`NewRule`]; returns 201 + stored rule |
//! | `GET`  | `/rules/{domain}/resolve?name=` | Single-name lookup |
//! | `POST` | `/rules/{domain}/{id}/deactivate` | Soft delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use weft_core::{
  resolve::Match,
  rule::{ConversionRule, Domain, NewRule},
  store::ConversionStore,
};

use crate::error::ApiError;

fn parse_domain(s: &str) -> Result<Domain, ApiError> {
  s.parse().map_err(|e: weft_core::Error| ApiError::BadRequest(e.to_string()))
}

/// `GET /rules/{domain}`
pub async fn list_active<S>(
  State(store): State<Arc<S>>,
  Path(domain): Path<String>,
) -> Result<Json<Vec<ConversionRule>>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain = parse_domain(&domain)?;
  let rules = store
    .list_active_rules(domain)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rules))
}

/// `GET /rules/{domain}/all`
pub async fn list_all<S>(
  State(store): State<Arc<S>>,
  Path(domain): Path<String>,
) -> Result<Json<Vec<ConversionRule>>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain = parse_domain(&domain)?;
  let rules = store
    .list_rules(domain)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rules))
}

/// `POST /rules/{domain}` — returns 201 + the stored rule.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(domain): Path<String>,
  Json(body): Json<NewRule>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain = parse_domain(&domain)?;
  // Reject malformed input here so the client sees a 400, not a 500.
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let rule = store
    .add_rule(domain, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(rule)))
}

/// `POST /rules/{domain}/{id}/deactivate`
pub async fn deactivate<S>(
  State(store): State<Arc<S>>,
  Path((domain, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain = parse_domain(&domain)?;
  store
    .deactivate_rule(domain, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Single-name resolution ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
  pub name: String,
}

/// `GET /rules/{domain}/resolve?name=<free text>`
pub async fn resolve_one<S>(
  State(store): State<Arc<S>>,
  Path(domain): Path<String>,
  Query(params): Query<ResolveParams>,
) -> Result<Json<Match>, ApiError>
where
  S: ConversionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let domain = parse_domain(&domain)?;
  let matched = weft_engine::resolve_name(store.as_ref(), domain, &params.name).await?;
  matched
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("no {domain} rule matches {:?}", params.name)))
}
