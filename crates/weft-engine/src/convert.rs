//! The batch conversion orchestrator.
//!
//! Records are processed sequentially and independently: one record's
//! trouble never aborts the batch, and every record — success or failure —
//! leaves exactly one history row behind.

use tracing::{info, warn};
use weft_core::{
  batch::ConversionResult,
  history::{ConversionKind, ConversionStatus, NewHistory},
  product::Product,
  resolve::{self, CompositeMatch, Match},
  rule::{ConversionRule, Domain},
  store::ConversionStore,
};

use crate::{Error, ErrorCollector, Result};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Knobs for one conversion batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
  pub convert_colors: bool,
  pub convert_sizes:  bool,
  /// Results strictly below this confidence are recorded as failed.
  pub confidence_threshold: f64,
}

impl Default for BatchOptions {
  fn default() -> Self {
    Self {
      convert_colors: true,
      convert_sizes: true,
      confidence_threshold: 0.5,
    }
  }
}

// ─── Single-value entry points ───────────────────────────────────────────────

/// Resolve one name against a domain's active rules.
pub async fn resolve_name<S: ConversionStore>(
  store: &S,
  domain: Domain,
  name: &str,
) -> Result<Option<Match>> {
  let rules = store
    .list_active_rules(domain)
    .await
    .map_err(Error::store)?;
  let matched = resolve::resolve(name, &rules);
  if matched.is_none() {
    warn!(%domain, name, "no conversion rule matched");
  }
  Ok(matched)
}

/// Split a combined color/size value and resolve both halves.
pub async fn resolve_composite_value<S: ConversionStore>(
  store: &S,
  composite: &str,
) -> Result<CompositeMatch> {
  let color_rules = store
    .list_active_rules(Domain::Color)
    .await
    .map_err(Error::store)?;
  let size_rules = store
    .list_active_rules(Domain::Size)
    .await
    .map_err(Error::store)?;
  Ok(resolve::resolve_composite(composite, &color_rules, &size_rules))
}

// ─── Batch run ───────────────────────────────────────────────────────────────

/// Convert a batch of products, appending one history row per product.
///
/// Rules for each enabled domain are loaded once at the start of the run;
/// rule-table edits made mid-batch are not observed. A storage failure on
/// one record's history append downgrades that record to `failed`, lands
/// in `collector`, and the batch moves on to the next record.
pub async fn run_batch<S: ConversionStore>(
  store: &S,
  products: &[Product],
  options: &BatchOptions,
  collector: &mut ErrorCollector,
) -> Result<Vec<ConversionResult>> {
  if !(0.0..=1.0).contains(&options.confidence_threshold) {
    return Err(Error::Validation(format!(
      "confidence threshold {} is outside the [0, 1] range",
      options.confidence_threshold
    )));
  }

  let color_rules = if options.convert_colors {
    store
      .list_active_rules(Domain::Color)
      .await
      .map_err(Error::store)?
  } else {
    Vec::new()
  };
  let size_rules = if options.convert_sizes {
    store
      .list_active_rules(Domain::Size)
      .await
      .map_err(Error::store)?
  } else {
    Vec::new()
  };

  let mut results = Vec::with_capacity(products.len());

  for product in products {
    let mut result = convert_one(product, options, &color_rules, &size_rules);

    if let Err(e) = store.record_history(history_entry(&result, product)).await {
      warn!(
        record_id = %product.record_id,
        error = %e,
        "failed to record conversion history"
      );
      collector.record(Some(&product.record_id), e.to_string());
      result.status = ConversionStatus::Failed;
      result.error_message = Some(e.to_string());
    }

    results.push(result);
  }

  let successful = results
    .iter()
    .filter(|r| r.status == ConversionStatus::Success)
    .count();
  info!(
    total = results.len(),
    successful,
    failed = results.len() - successful,
    "conversion batch complete"
  );

  Ok(results)
}

/// Pure per-record resolution; cannot touch storage.
fn convert_one(
  product: &Product,
  options: &BatchOptions,
  color_rules: &[ConversionRule],
  size_rules: &[ConversionRule],
) -> ConversionResult {
  let mut result = ConversionResult {
    record_id:           product.record_id.clone(),
    original_color_name: product.color_name.clone(),
    original_size_name:  product.size_name.clone(),
    original_composite:  product.composite_value.clone(),
    resolved_color_id:   None,
    resolved_color_name: None,
    resolved_size_id:    None,
    resolved_size_name:  None,
    confidence:          0.0,
    kind:                ConversionKind::Auto,
    status:              ConversionStatus::Failed,
    error_message:       None,
  };

  // Fields that already carry an ID are left alone.
  if options.convert_colors && product.color_id.is_none() {
    let name = product.color_name.as_deref().unwrap_or("");
    match resolve::resolve(name, color_rules) {
      Some(m) => {
        result.resolved_color_id = Some(m.target_id);
        result.resolved_color_name = Some(m.target_name);
        result.confidence = result.confidence.max(m.confidence);
      }
      None if !name.is_empty() => {
        warn!(record_id = %result.record_id, color_name = name, "no color rule matched");
      }
      None => {}
    }
  }

  if options.convert_sizes && product.size_id.is_none() {
    let name = product.size_name.as_deref().unwrap_or("");
    match resolve::resolve(name, size_rules) {
      Some(m) => {
        result.resolved_size_id = Some(m.target_id);
        result.resolved_size_name = Some(m.target_name);
        result.confidence = result.confidence.max(m.confidence);
      }
      None if !name.is_empty() => {
        warn!(record_id = %result.record_id, size_name = name, "no size rule matched");
      }
      None => {}
    }
  }

  if result.confidence >= options.confidence_threshold {
    result.status = ConversionStatus::Success;
  } else {
    result.status = ConversionStatus::Failed;
    result.error_message =
      Some(format!("insufficient confidence: {:.2}", result.confidence));
  }

  result
}

fn history_entry(result: &ConversionResult, product: &Product) -> NewHistory {
  let original_value = product.composite_value.clone().unwrap_or_else(|| {
    format!(
      "{}/{}",
      product.color_name.as_deref().unwrap_or_default(),
      product.size_name.as_deref().unwrap_or_default()
    )
  });

  NewHistory {
    record_id:         result.record_id.clone(),
    original_value,
    resolved_color_id: result.resolved_color_id,
    resolved_size_id:  result.resolved_size_id,
    kind:              result.kind,
    status:            result.status,
    confidence:        result.confidence,
    error_message:     result.error_message.clone(),
  }
}
