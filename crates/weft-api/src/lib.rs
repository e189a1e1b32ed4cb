//! JSON API for Weft.
//!
//! Exposes an axum [`Router`] backed by any
//! [`weft_core::store::ConversionStore`]. Rendering, session state and
//! transport security are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", weft_api::api_router(store.clone()))
//! ```

pub mod convert;
pub mod error;
pub mod history;
pub mod products;
pub mod register;
pub mod rules;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use weft_core::store::ConversionStore;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Install the starter rule set at boot.
  #[serde(default)]
  pub seed_defaults: bool,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ConversionStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Rules
    .route(
      "/rules/{domain}",
      get(rules::list_active::<S>).post(rules::create::<S>),
    )
    .route("/rules/{domain}/all", get(rules::list_all::<S>))
    .route("/rules/{domain}/resolve", get(rules::resolve_one::<S>))
    .route(
      "/rules/{domain}/{id}/deactivate",
      post(rules::deactivate::<S>),
    )
    // Products
    .route("/products", get(products::list::<S>))
    // Conversion
    .route("/convert", post(convert::run::<S>))
    .route("/convert/composite", get(convert::composite::<S>))
    // Registration
    .route("/register", post(register::run::<S>))
    .route("/register/validate", post(register::validate))
    .route("/assignments/{domain}", get(register::recent::<S>))
    // History
    .route("/history", get(history::list::<S>))
    .with_state(store)
}
