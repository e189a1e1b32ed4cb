//! The `ConversionStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `weft-store-sqlite`).
//! Higher layers (`weft-engine`, `weft-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  batch::{Assignment, WriteSummary},
  history::{ConversionHistory, NewHistory},
  product::{Product, ProductFilter},
  rule::{ConversionRule, Domain, NewRule},
};

/// Abstraction over a Weft storage backend.
///
/// Every write runs inside its own transaction: commit on success, rollback
/// on error — a caller never observes a partially-applied multi-row write.
/// The history table is append-only; rules are soft-deleted only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ConversionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Rules ─────────────────────────────────────────────────────────────

  /// Active rules for `domain`, ordered by `source_name` ascending, then
  /// row id. The matcher relies on this ordering for its deterministic
  /// first-match tie-break between duplicate source names.
  fn list_active_rules(
    &self,
    domain: Domain,
  ) -> impl Future<Output = Result<Vec<ConversionRule>, Self::Error>> + Send + '_;

  /// All rules for `domain`, inactive ones included. Administration view.
  fn list_rules(
    &self,
    domain: Domain,
  ) -> impl Future<Output = Result<Vec<ConversionRule>, Self::Error>> + Send + '_;

  /// Validate and persist a new rule; returns the stored row.
  fn add_rule(
    &self,
    domain: Domain,
    rule: NewRule,
  ) -> impl Future<Output = Result<ConversionRule, Self::Error>> + Send + '_;

  /// Soft-delete a rule: set `is_active = false` and bump `updated_at`.
  ///
  /// Deactivating an already-inactive rule is a no-op, not an error; an
  /// unknown id is an error.
  fn deactivate_rule(
    &self,
    domain: Domain,
    rule_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Products ──────────────────────────────────────────────────────────

  /// Fetch product rows matching `filter`, ordered by `record_id`.
  fn list_products<'a>(
    &'a self,
    filter: &'a ProductFilter,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + 'a;

  // ── History — append-only ─────────────────────────────────────────────

  /// Append one conversion attempt to the history trace.
  /// The `created_at` timestamp is set by the store.
  fn record_history(
    &self,
    entry: NewHistory,
  ) -> impl Future<Output = Result<ConversionHistory, Self::Error>> + Send + '_;

  /// Most recent history rows, newest first.
  fn list_history(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ConversionHistory>, Self::Error>> + Send + '_;

  // ── Assignment upserts ────────────────────────────────────────────────

  /// Upsert resolved color assignments, keyed by `record_id`. Products
  /// without a `color_id` are skipped and counted. On conflict the
  /// display name, color name, id and `updated_at` are overwritten;
  /// `created_at` keeps its original value.
  fn write_colors<'a>(
    &'a self,
    products: &'a [Product],
  ) -> impl Future<Output = Result<WriteSummary, Self::Error>> + Send + 'a;

  /// Upsert resolved size assignments; same contract as
  /// [`Self::write_colors`].
  fn write_sizes<'a>(
    &'a self,
    products: &'a [Product],
  ) -> impl Future<Output = Result<WriteSummary, Self::Error>> + Send + 'a;

  /// Most recently updated rows in a domain's assignment table.
  /// Inspection view for registration follow-up.
  fn list_recent_assignments(
    &self,
    domain: Domain,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;
}
