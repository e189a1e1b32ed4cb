//! Registration — pushing resolved assignments into the target tables.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;
use weft_core::{batch::BatchResult, product::Product, store::ConversionStore};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which target tables a registration run touches.
#[derive(Debug, Clone, Copy)]
pub struct RegisterOptions {
  pub write_colors: bool,
  pub write_sizes:  bool,
}

impl Default for RegisterOptions {
  fn default() -> Self {
    Self { write_colors: true, write_sizes: true }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Pre-write validation report over a product batch.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
  pub total:    usize,
  pub valid:    usize,
  pub invalid:  usize,
  pub errors:   Vec<String>,
  pub warnings: Vec<String>,
}

impl ValidationReport {
  pub fn is_valid(&self) -> bool { self.invalid == 0 }
}

/// Check a batch before registration.
///
/// Missing identifying fields are errors; unresolved IDs are warnings
/// only, since the writers skip those rows rather than reject them.
pub fn validate_products(products: &[Product]) -> ValidationReport {
  let mut report = ValidationReport {
    total: products.len(),
    ..Default::default()
  };

  for product in products {
    let mut record_errors = Vec::new();

    if product.record_id.trim().is_empty() {
      record_errors.push("record id is empty".to_string());
    }
    if product.display_name.trim().is_empty() {
      record_errors.push("display name is empty".to_string());
    }
    if product.color_id.is_none() {
      report
        .warnings
        .push(format!("{}: color id not resolved", product.record_id));
    }
    if product.size_id.is_none() {
      report
        .warnings
        .push(format!("{}: size id not resolved", product.record_id));
    }

    if record_errors.is_empty() {
      report.valid += 1;
    } else {
      report.invalid += 1;
      report.errors.extend(
        record_errors
          .into_iter()
          .map(|e| format!("{}: {e}", product.record_id)),
      );
    }
  }

  report
}

// ─── Batch registration ──────────────────────────────────────────────────────

/// Register a batch into both target tables.
///
/// The two writers run independently; a failure in one is captured in
/// `errors` and does not stop the other. The returned result carries both
/// write summaries and the wall-clock bounds of the run.
pub async fn batch_insert<S: ConversionStore>(
  store: &S,
  products: &[Product],
  options: &RegisterOptions,
) -> BatchResult {
  let mut result = BatchResult {
    run_id:       Uuid::new_v4(),
    total:        products.len(),
    colors:       None,
    sizes:        None,
    started_at:   Utc::now(),
    completed_at: Utc::now(),
    errors:       Vec::new(),
  };

  info!(run_id = %result.run_id, total = products.len(), "registration batch started");

  if options.write_colors {
    match store.write_colors(products).await {
      Ok(summary) => {
        info!(
          run_id = %result.run_id,
          inserted = summary.inserted,
          skipped = summary.skipped,
          "color assignments written"
        );
        result.colors = Some(summary);
      }
      Err(e) => {
        error!(run_id = %result.run_id, error = %e, "color assignment write failed");
        result.errors.push(format!("color write failed: {e}"));
      }
    }
  }

  if options.write_sizes {
    match store.write_sizes(products).await {
      Ok(summary) => {
        info!(
          run_id = %result.run_id,
          inserted = summary.inserted,
          skipped = summary.skipped,
          "size assignments written"
        );
        result.sizes = Some(summary);
      }
      Err(e) => {
        error!(run_id = %result.run_id, error = %e, "size assignment write failed");
        result.errors.push(format!("size write failed: {e}"));
      }
    }
  }

  result.completed_at = Utc::now();
  info!(
    run_id = %result.run_id,
    success = result.is_success(),
    "registration batch complete"
  );
  result
}
