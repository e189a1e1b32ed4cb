//! Name resolution — the two-pass matcher and the composite-value splitter.
//!
//! Resolution is deterministic given a fixed rule ordering: both passes
//! take the first rule that matches, so duplicate source names are settled
//! by store order. Downstream consumers rely on that for reproducible
//! batch runs; do not reorder the passes or the rules.

use serde::{Deserialize, Serialize};

use crate::rule::ConversionRule;

/// Confidence multiplier applied when only a substring relation matched.
pub const PARTIAL_MATCH_PENALTY: f64 = 0.8;

/// Delimiters tried, in priority order, when splitting a composite value.
pub const COMPOSITE_DELIMITERS: [char; 4] = ['/', '-', '_', ' '];

// ─── Match ───────────────────────────────────────────────────────────────────

/// A successful rule lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
  pub target_id:   i64,
  pub target_name: String,
  pub confidence:  f64,
}

// ─── Single-name resolution ──────────────────────────────────────────────────

/// Resolve a free-text name against a domain's rule set.
///
/// Pass one looks for a case-insensitive exact match and returns the stored
/// confidence unmodified. Pass two accepts a substring relation in either
/// direction, at [`PARTIAL_MATCH_PENALTY`] times the stored confidence.
/// A blank name or an exhausted rule set yields `None`; neither is an
/// error.
pub fn resolve(name: &str, rules: &[ConversionRule]) -> Option<Match> {
  if name.trim().is_empty() {
    return None;
  }

  let needle = name.to_lowercase();

  for rule in rules {
    if rule.source_name.to_lowercase() == needle {
      return Some(Match {
        target_id:   rule.target_id,
        target_name: rule.target_name.clone(),
        confidence:  rule.confidence,
      });
    }
  }

  for rule in rules {
    let source = rule.source_name.to_lowercase();
    if source.contains(&needle) || needle.contains(&source) {
      return Some(Match {
        target_id:   rule.target_id,
        target_name: rule.target_name.clone(),
        confidence:  rule.confidence * PARTIAL_MATCH_PENALTY,
      });
    }
  }

  None
}

// ─── Composite values ────────────────────────────────────────────────────────

/// Split a combined "color/size" value into its two halves.
///
/// The first delimiter (in [`COMPOSITE_DELIMITERS`] priority order) present
/// anywhere in the input wins, and the split happens at its first
/// occurrence only. A value with no delimiter is treated as a color-only
/// candidate — never size-only.
pub fn split_composite(composite: &str) -> (Option<String>, Option<String>) {
  for delim in COMPOSITE_DELIMITERS {
    if let Some((left, right)) = composite.split_once(delim) {
      return (
        Some(left.trim().to_string()),
        Some(right.trim().to_string()),
      );
    }
  }
  (Some(composite.trim().to_string()), None)
}

/// Outcome of resolving a composite value: each half independently, plus a
/// combined confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeMatch {
  pub color:      Option<Match>,
  pub size:       Option<Match>,
  pub confidence: f64,
}

/// Split `composite` and resolve each half against its own rule set.
///
/// Combined confidence: mean of both halves when both resolve, half of the
/// resolved side when only one does, `0.0` when neither does.
pub fn resolve_composite(
  composite: &str,
  color_rules: &[ConversionRule],
  size_rules: &[ConversionRule],
) -> CompositeMatch {
  let (color_part, size_part) = split_composite(composite);

  let color = color_part
    .as_deref()
    .and_then(|name| resolve(name, color_rules));
  let size = size_part
    .as_deref()
    .and_then(|name| resolve(name, size_rules));

  let confidence = match (&color, &size) {
    (Some(c), Some(s)) => (c.confidence + s.confidence) / 2.0,
    (Some(c), None) => c.confidence * 0.5,
    (None, Some(s)) => s.confidence * 0.5,
    (None, None) => 0.0,
  };

  CompositeMatch { color, size, confidence }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn rule(id: i64, source: &str, target_id: i64, target: &str, confidence: f64) -> ConversionRule {
    ConversionRule {
      id,
      source_name: source.to_string(),
      target_id,
      target_name: target.to_string(),
      confidence,
      is_active: true,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn exact_match_keeps_stored_confidence() {
    let rules = vec![rule(1, "レッド", 1, "Red", 0.9)];
    let m = resolve("レッド", &rules).unwrap();
    assert_eq!(m.target_id, 1);
    assert_eq!(m.target_name, "Red");
    assert_eq!(m.confidence, 0.9);
  }

  #[test]
  fn exact_match_is_case_insensitive() {
    let rules = vec![rule(1, "Blue", 2, "Blue", 1.0)];
    let m = resolve("bLuE", &rules).unwrap();
    assert_eq!(m.target_id, 2);
    assert_eq!(m.confidence, 1.0);
  }

  #[test]
  fn substring_match_applies_penalty() {
    let rules = vec![rule(1, "ネイビーブルー", 9, "Navy", 1.0)];
    // Input contained in the source name.
    let m = resolve("ネイビー", &rules).unwrap();
    assert_eq!(m.target_id, 9);
    assert_eq!(m.confidence, PARTIAL_MATCH_PENALTY);
    // Source name contained in the input.
    let m = resolve("ダークネイビーブルー系", &rules).unwrap();
    assert_eq!(m.target_id, 9);
  }

  #[test]
  fn exact_match_beats_earlier_substring() {
    // "Red" appears as a substring of the first rule's source, but the
    // exact pass must win even though the substring rule sorts first.
    let rules = vec![
      rule(1, "Dark Red", 10, "DarkRed", 1.0),
      rule(2, "Red", 1, "Red", 1.0),
    ];
    let m = resolve("red", &rules).unwrap();
    assert_eq!(m.target_id, 1);
    assert_eq!(m.confidence, 1.0);
  }

  #[test]
  fn duplicate_source_names_first_in_order_wins() {
    let rules = vec![
      rule(1, "M", 2, "Medium", 1.0),
      rule(2, "M", 5, "Misses", 0.7),
    ];
    let m = resolve("M", &rules).unwrap();
    assert_eq!(m.target_id, 2);
    assert_eq!(m.target_name, "Medium");
  }

  #[test]
  fn blank_name_is_no_match() {
    let rules = vec![rule(1, "Red", 1, "Red", 1.0)];
    assert!(resolve("", &rules).is_none());
    assert!(resolve("   ", &rules).is_none());
  }

  #[test]
  fn unknown_name_is_no_match() {
    let rules = vec![rule(1, "Red", 1, "Red", 1.0)];
    assert!(resolve("緑", &rules).is_none());
  }

  #[test]
  fn split_on_slash() {
    assert_eq!(
      split_composite("レッド/M"),
      (Some("レッド".to_string()), Some("M".to_string()))
    );
  }

  #[test]
  fn split_on_hyphen() {
    assert_eq!(
      split_composite("Blue-L"),
      (Some("Blue".to_string()), Some("L".to_string()))
    );
  }

  #[test]
  fn no_delimiter_is_color_only() {
    assert_eq!(split_composite("GreenS"), (Some("GreenS".to_string()), None));
  }

  #[test]
  fn delimiter_priority_beats_position() {
    // '-' comes first in the string, but '/' has higher priority.
    assert_eq!(
      split_composite("navy-blue/XL"),
      (Some("navy-blue".to_string()), Some("XL".to_string()))
    );
  }

  #[test]
  fn split_at_first_occurrence_only() {
    assert_eq!(
      split_composite("a-b-c"),
      (Some("a".to_string()), Some("b-c".to_string()))
    );
  }

  #[test]
  fn split_trims_whitespace() {
    assert_eq!(
      split_composite(" Red / M "),
      (Some("Red".to_string()), Some("M".to_string()))
    );
  }

  #[test]
  fn composite_both_resolved_averages_confidence() {
    let colors = vec![rule(1, "レッド", 1, "Red", 1.0)];
    let sizes = vec![rule(1, "M", 2, "Medium", 0.8)];
    let m = resolve_composite("レッド/M", &colors, &sizes);
    assert_eq!(m.color.as_ref().unwrap().target_id, 1);
    assert_eq!(m.size.as_ref().unwrap().target_id, 2);
    assert!((m.confidence - 0.9).abs() < 1e-9);
  }

  #[test]
  fn composite_color_only_halves_confidence() {
    let colors = vec![rule(1, "レッド", 1, "Red", 1.0)];
    let m = resolve_composite("レッド/ZZ", &colors, &[]);
    assert_eq!(m.color.as_ref().unwrap().target_id, 1);
    assert!(m.size.is_none());
    assert!((m.confidence - 0.5).abs() < 1e-9);
  }

  #[test]
  fn composite_size_only_halves_confidence() {
    let sizes = vec![rule(1, "M", 2, "Medium", 1.0)];
    let m = resolve_composite("??/M", &[], &sizes);
    assert!(m.color.is_none());
    assert_eq!(m.size.as_ref().unwrap().target_id, 2);
    assert!((m.confidence - 0.5).abs() < 1e-9);
  }

  #[test]
  fn composite_neither_resolved_is_zero() {
    let m = resolve_composite("??/??", &[], &[]);
    assert!(m.color.is_none());
    assert!(m.size.is_none());
    assert_eq!(m.confidence, 0.0);
  }
}
