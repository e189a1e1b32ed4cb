//! Starter rule set for a fresh database.

use tracing::{info, warn};
use weft_core::{
  rule::{Domain, NewRule},
  store::ConversionStore,
};

const COLOR_RULES: [(&str, i64, &str); 8] = [
  ("レッド", 1, "Red"),
  ("ブルー", 2, "Blue"),
  ("グリーン", 3, "Green"),
  ("イエロー", 4, "Yellow"),
  ("ブラック", 5, "Black"),
  ("ホワイト", 6, "White"),
  ("ピンク", 7, "Pink"),
  ("オレンジ", 8, "Orange"),
];

const SIZE_RULES: [(&str, i64, &str); 6] = [
  ("S", 1, "Small"),
  ("M", 2, "Medium"),
  ("L", 3, "Large"),
  ("XL", 4, "Extra Large"),
  ("XXL", 5, "Double Extra Large"),
  ("XS", 6, "Extra Small"),
];

/// Install the default rule set.
///
/// Individual failures are logged and skipped, so seeding a partially
/// seeded database finishes the job instead of dying half way.
pub async fn seed_default_rules<S: ConversionStore>(store: &S) {
  for (source, target_id, target_name) in COLOR_RULES {
    if let Err(e) = store
      .add_rule(Domain::Color, NewRule::new(source, target_id, target_name))
      .await
    {
      warn!(source, error = %e, "skipping color rule");
    }
  }

  for (source, target_id, target_name) in SIZE_RULES {
    if let Err(e) = store
      .add_rule(Domain::Size, NewRule::new(source, target_id, target_name))
      .await
    {
      warn!(source, error = %e, "skipping size rule");
    }
  }

  info!("default conversion rules installed");
}
