//! Integration tests for `SqliteStore` against an in-memory database.

use weft_core::{
  history::{ConversionKind, ConversionStatus, NewHistory},
  product::{Product, ProductFilter},
  rule::{Domain, NewRule},
  store::ConversionStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn converted_product(record_id: &str, color_id: Option<i64>, size_id: Option<i64>) -> Product {
  Product {
    color_name: Some("レッド".into()),
    size_name: Some("M".into()),
    color_id,
    size_id,
    ..Product::new(record_id, format!("shirt {record_id}"))
  }
}

fn history_entry(record_id: &str, status: ConversionStatus) -> NewHistory {
  NewHistory {
    record_id:         record_id.into(),
    original_value:    "レッド/M".into(),
    resolved_color_id: Some(1),
    resolved_size_id:  Some(2),
    kind:              ConversionKind::Auto,
    status,
    confidence:        1.0,
    error_message:     None,
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_rule_returns_stored_row() {
  let s = store().await;

  let rule = s
    .add_rule(Domain::Color, NewRule::new("レッド", 1, "Red"))
    .await
    .unwrap();

  assert!(rule.id > 0);
  assert_eq!(rule.source_name, "レッド");
  assert_eq!(rule.target_id, 1);
  assert_eq!(rule.confidence, 1.0);
  assert!(rule.is_active);
}

#[tokio::test]
async fn list_active_rules_orders_by_source_name() {
  let s = store().await;
  s.add_rule(Domain::Color, NewRule::new("ブルー", 2, "Blue"))
    .await
    .unwrap();
  s.add_rule(Domain::Color, NewRule::new("イエロー", 4, "Yellow"))
    .await
    .unwrap();
  s.add_rule(Domain::Color, NewRule::new("レッド", 1, "Red"))
    .await
    .unwrap();

  let rules = s.list_active_rules(Domain::Color).await.unwrap();
  let sources: Vec<&str> = rules.iter().map(|r| r.source_name.as_str()).collect();
  let mut sorted = sources.clone();
  sorted.sort();
  assert_eq!(sources, sorted);
  assert_eq!(rules.len(), 3);
}

#[tokio::test]
async fn duplicate_source_names_keep_insertion_order() {
  let s = store().await;
  let first = s
    .add_rule(Domain::Size, NewRule::new("M", 2, "Medium"))
    .await
    .unwrap();
  let second = s
    .add_rule(Domain::Size, NewRule::new("M", 5, "Misses").with_confidence(0.7))
    .await
    .unwrap();

  let rules = s.list_active_rules(Domain::Size).await.unwrap();
  assert_eq!(rules.len(), 2);
  assert_eq!(rules[0].id, first.id);
  assert_eq!(rules[1].id, second.id);
}

#[tokio::test]
async fn rule_domains_are_independent() {
  let s = store().await;
  s.add_rule(Domain::Color, NewRule::new("レッド", 1, "Red"))
    .await
    .unwrap();

  assert_eq!(s.list_active_rules(Domain::Color).await.unwrap().len(), 1);
  assert!(s.list_active_rules(Domain::Size).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rule_rejects_blank_source_name() {
  let s = store().await;
  let err = s
    .add_rule(Domain::Color, NewRule::new("  ", 1, "Red"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weft_core::Error::EmptySourceName)
  ));
}

#[tokio::test]
async fn add_rule_rejects_out_of_range_confidence() {
  let s = store().await;
  let err = s
    .add_rule(Domain::Color, NewRule::new("レッド", 1, "Red").with_confidence(1.5))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weft_core::Error::ConfidenceOutOfRange(_))
  ));
}

#[tokio::test]
async fn deactivate_rule_hides_it_from_active_listing() {
  let s = store().await;
  let rule = s
    .add_rule(Domain::Color, NewRule::new("レッド", 1, "Red"))
    .await
    .unwrap();

  s.deactivate_rule(Domain::Color, rule.id).await.unwrap();

  assert!(s.list_active_rules(Domain::Color).await.unwrap().is_empty());

  // Still present in the administration view, flagged inactive.
  let all = s.list_rules(Domain::Color).await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(!all[0].is_active);
}

#[tokio::test]
async fn deactivate_rule_twice_is_a_no_op() {
  let s = store().await;
  let rule = s
    .add_rule(Domain::Size, NewRule::new("M", 2, "Medium"))
    .await
    .unwrap();

  s.deactivate_rule(Domain::Size, rule.id).await.unwrap();
  s.deactivate_rule(Domain::Size, rule.id).await.unwrap();

  assert!(s.list_active_rules(Domain::Size).await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivate_unknown_rule_errors() {
  let s = store().await;
  let err = s.deactivate_rule(Domain::Color, 9999).await.unwrap_err();
  assert!(matches!(err, crate::Error::RuleNotFound(9999)));
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_history_assigns_id_and_timestamp() {
  let s = store().await;

  let row = s
    .record_history(history_entry("P001", ConversionStatus::Success))
    .await
    .unwrap();

  assert!(row.id > 0);
  assert_eq!(row.record_id, "P001");
  assert_eq!(row.status, ConversionStatus::Success);
}

#[tokio::test]
async fn list_history_returns_newest_first() {
  let s = store().await;
  s.record_history(history_entry("P001", ConversionStatus::Success))
    .await
    .unwrap();
  s.record_history(history_entry("P002", ConversionStatus::Failed))
    .await
    .unwrap();
  s.record_history(history_entry("P003", ConversionStatus::Success))
    .await
    .unwrap();

  let rows = s.list_history(10).await.unwrap();
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0].record_id, "P003");
  assert_eq!(rows[2].record_id, "P001");
}

#[tokio::test]
async fn list_history_honours_limit() {
  let s = store().await;
  for i in 0..5 {
    s.record_history(history_entry(&format!("P{i:03}"), ConversionStatus::Success))
      .await
      .unwrap();
  }

  let rows = s.list_history(2).await.unwrap();
  assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn history_roundtrips_failure_fields() {
  let s = store().await;

  let mut entry = history_entry("P010", ConversionStatus::Failed);
  entry.resolved_color_id = None;
  entry.resolved_size_id = None;
  entry.confidence = 0.25;
  entry.error_message = Some("insufficient confidence: 0.25".into());
  s.record_history(entry).await.unwrap();

  let rows = s.list_history(1).await.unwrap();
  assert_eq!(rows[0].status, ConversionStatus::Failed);
  assert_eq!(rows[0].resolved_color_id, None);
  assert_eq!(rows[0].confidence, 0.25);
  assert_eq!(
    rows[0].error_message.as_deref(),
    Some("insufficient confidence: 0.25")
  );
}

// ─── Assignment upserts ──────────────────────────────────────────────────────

#[tokio::test]
async fn write_colors_inserts_resolved_and_skips_rest() {
  let s = store().await;
  let products = vec![
    converted_product("P001", Some(1), None),
    converted_product("P002", Some(2), None),
    converted_product("P003", None, Some(2)),
  ];

  let summary = s.write_colors(&products).await.unwrap();
  assert_eq!(summary.inserted, 2);
  assert_eq!(summary.skipped, 1);

  let rows = s
    .list_recent_assignments(Domain::Color, 10)
    .await
    .unwrap();
  assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn write_colors_with_nothing_resolved_touches_nothing() {
  let s = store().await;
  let products = vec![converted_product("P001", None, None)];

  let summary = s.write_colors(&products).await.unwrap();
  assert_eq!(summary.inserted, 0);
  assert_eq!(summary.skipped, 1);
  assert!(
    s.list_recent_assignments(Domain::Color, 10)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn write_colors_twice_upserts_in_place() {
  let s = store().await;

  let first = vec![converted_product("P001", Some(1), None)];
  s.write_colors(&first).await.unwrap();

  let before = s.list_recent_assignments(Domain::Color, 10).await.unwrap();
  let original_created_at = before[0].created_at;

  let mut second = first.clone();
  second[0].display_name = "renamed shirt".into();
  second[0].color_id = Some(5);
  let summary = s.write_colors(&second).await.unwrap();
  assert_eq!(summary.inserted, 1);

  let rows = s
    .list_recent_assignments(Domain::Color, 10)
    .await
    .unwrap();
  // Same record, overwritten, not duplicated.
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].record_id, "P001");
  assert_eq!(rows[0].display_name, "renamed shirt");
  assert_eq!(rows[0].target_id, 5);
  assert_eq!(rows[0].created_at, original_created_at);
  assert!(rows[0].updated_at >= original_created_at);
}

#[tokio::test]
async fn write_sizes_uses_its_own_table() {
  let s = store().await;
  let products = vec![converted_product("P001", Some(1), Some(2))];

  s.write_sizes(&products).await.unwrap();

  assert!(
    s.list_recent_assignments(Domain::Color, 10)
      .await
      .unwrap()
      .is_empty()
  );
  let sizes = s.list_recent_assignments(Domain::Size, 10).await.unwrap();
  assert_eq!(sizes.len(), 1);
  assert_eq!(sizes[0].target_id, 2);
  assert_eq!(sizes[0].source_name.as_deref(), Some("M"));
}

// ─── Products ────────────────────────────────────────────────────────────────

async fn seed_products(s: &SqliteStore) {
  let rows = vec![
    converted_product("P001", Some(1), None),
    converted_product("P002", None, Some(2)),
    Product {
      color_name: Some("グリーン".into()),
      ..Product::new("P003", "plain tee")
    },
  ];
  for p in &rows {
    s.insert_product(p).await.unwrap();
  }
}

#[tokio::test]
async fn list_products_returns_all_by_default() {
  let s = store().await;
  seed_products(&s).await;

  let products = s.list_products(&ProductFilter::default()).await.unwrap();
  assert_eq!(products.len(), 3);
  // Ordered by record_id.
  assert_eq!(products[0].record_id, "P001");
  assert_eq!(products[2].record_id, "P003");
}

#[tokio::test]
async fn list_products_filters_unconverted_colors() {
  let s = store().await;
  seed_products(&s).await;

  let filter = ProductFilter {
    has_color_id: Some(false),
    ..Default::default()
  };
  let products = s.list_products(&filter).await.unwrap();
  assert_eq!(products.len(), 2);
  assert!(products.iter().all(|p| p.color_id.is_none()));
}

#[tokio::test]
async fn list_products_matches_name_pattern_with_star_wildcard() {
  let s = store().await;
  seed_products(&s).await;

  let filter = ProductFilter {
    display_name_pattern: Some("*tee*".into()),
    ..Default::default()
  };
  let products = s.list_products(&filter).await.unwrap();
  assert_eq!(products.len(), 1);
  assert_eq!(products[0].record_id, "P003");
}

#[tokio::test]
async fn list_products_applies_limit_and_offset() {
  let s = store().await;
  seed_products(&s).await;

  let filter = ProductFilter {
    limit: Some(1),
    offset: Some(1),
    ..Default::default()
  };
  let products = s.list_products(&filter).await.unwrap();
  assert_eq!(products.len(), 1);
  assert_eq!(products[0].record_id, "P002");
}
