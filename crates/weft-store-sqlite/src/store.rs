//! [`SqliteStore`] — the SQLite implementation of [`ConversionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use weft_core::{
  batch::{Assignment, WriteSummary},
  history::{ConversionHistory, NewHistory},
  product::{Product, ProductFilter},
  rule::{ConversionRule, Domain, NewRule},
  store::ConversionStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawHistory, RawProduct, RawRule, encode_dt, encode_kind,
    encode_status,
  },
  schema::SCHEMA,
};

// ─── Per-domain SQL ──────────────────────────────────────────────────────────

/// Fixed SQL for one domain. Selected by matching on [`Domain`] — table
/// names are never assembled at runtime.
struct DomainSql {
  rules_active:       &'static str,
  rules_all:          &'static str,
  rule_insert:        &'static str,
  rule_deactivate:    &'static str,
  assign_insert_head: &'static str,
  assign_upsert_tail: &'static str,
  assign_recent:      &'static str,
}

const COLOR_SQL: DomainSql = DomainSql {
  rules_active: "SELECT id, source_name, target_id, target_name, confidence, \
     is_active, created_at, updated_at \
     FROM color_rules WHERE is_active = 1 ORDER BY source_name, id",
  rules_all: "SELECT id, source_name, target_id, target_name, confidence, \
     is_active, created_at, updated_at \
     FROM color_rules ORDER BY source_name, id",
  rule_insert: "INSERT INTO color_rules \
     (source_name, target_id, target_name, confidence, is_active, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)",
  rule_deactivate: "UPDATE color_rules SET is_active = 0, updated_at = ?2 WHERE id = ?1",
  assign_insert_head: "INSERT INTO color_assignments \
     (record_id, display_name, color_name, color_id, created_at, updated_at) VALUES ",
  assign_upsert_tail: " ON CONFLICT(record_id) DO UPDATE SET \
     display_name = excluded.display_name, \
     color_name   = excluded.color_name, \
     color_id     = excluded.color_id, \
     updated_at   = excluded.updated_at",
  assign_recent: "SELECT record_id, display_name, color_name, color_id, \
     created_at, updated_at \
     FROM color_assignments ORDER BY updated_at DESC, id DESC LIMIT ?1",
};

const SIZE_SQL: DomainSql = DomainSql {
  rules_active: "SELECT id, source_name, target_id, target_name, confidence, \
     is_active, created_at, updated_at \
     FROM size_rules WHERE is_active = 1 ORDER BY source_name, id",
  rules_all: "SELECT id, source_name, target_id, target_name, confidence, \
     is_active, created_at, updated_at \
     FROM size_rules ORDER BY source_name, id",
  rule_insert: "INSERT INTO size_rules \
     (source_name, target_id, target_name, confidence, is_active, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)",
  rule_deactivate: "UPDATE size_rules SET is_active = 0, updated_at = ?2 WHERE id = ?1",
  assign_insert_head: "INSERT INTO size_assignments \
     (record_id, display_name, size_name, size_id, created_at, updated_at) VALUES ",
  assign_upsert_tail: " ON CONFLICT(record_id) DO UPDATE SET \
     display_name = excluded.display_name, \
     size_name    = excluded.size_name, \
     size_id      = excluded.size_id, \
     updated_at   = excluded.updated_at",
  assign_recent: "SELECT record_id, display_name, size_name, size_id, \
     created_at, updated_at \
     FROM size_assignments ORDER BY updated_at DESC, id DESC LIMIT ?1",
};

fn domain_sql(domain: Domain) -> &'static DomainSql {
  match domain {
    Domain::Color => &COLOR_SQL,
    Domain::Size => &SIZE_SQL,
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Weft conversion store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load a catalogue row into the `products` table. Fixture and demo
  /// helper; the conversion pipeline itself never writes to `products`.
  pub async fn insert_product(&self, product: &Product) -> Result<()> {
    let p = product.clone();
    let created_at = p.created_at.map(encode_dt);
    let updated_at = p.updated_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO products (
             record_id, display_name, color_name, size_name, composite_value,
             color_id, size_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            p.record_id,
            p.display_name,
            p.color_name,
            p.size_name,
            p.composite_value,
            p.color_id,
            p.size_id,
            created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Shared upsert path for both assignment tables.
  async fn write_assignments(
    &self,
    domain: Domain,
    products: &[Product],
  ) -> Result<WriteSummary> {
    // (record_id, display_name, source name, target id) per eligible row.
    let rows: Vec<(String, String, Option<String>, i64)> = products
      .iter()
      .filter_map(|p| {
        let (name, id) = match domain {
          Domain::Color => (p.color_name.clone(), p.color_id),
          Domain::Size => (p.size_name.clone(), p.size_id),
        };
        id.map(|id| (p.record_id.clone(), p.display_name.clone(), name, id))
      })
      .collect();

    let skipped = (products.len() - rows.len()) as u64;

    if rows.is_empty() {
      return Ok(WriteSummary { inserted: 0, skipped });
    }

    let sql = domain_sql(domain);
    let now_str = encode_dt(Utc::now());

    let placeholders = vec!["(?, ?, ?, ?, ?, ?)"; rows.len()];
    let statement = format!(
      "{}{}{}",
      sql.assign_insert_head,
      placeholders.join(", "),
      sql.assign_upsert_tail,
    );

    let mut values: Vec<Value> = Vec::with_capacity(rows.len() * 6);
    for (record_id, display_name, name, id) in rows {
      values.push(Value::from(record_id));
      values.push(Value::from(display_name));
      values.push(Value::from(name));
      values.push(Value::from(id));
      values.push(Value::from(now_str.clone()));
      values.push(Value::from(now_str.clone()));
    }

    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let affected = tx.execute(&statement, params_from_iter(values))?;
        tx.commit()?;
        Ok(affected)
      })
      .await?;

    Ok(WriteSummary { inserted: inserted as u64, skipped })
  }
}

// ─── ConversionStore impl ────────────────────────────────────────────────────

impl ConversionStore for SqliteStore {
  type Error = Error;

  // ── Rules ─────────────────────────────────────────────────────────────────

  async fn list_active_rules(&self, domain: Domain) -> Result<Vec<ConversionRule>> {
    self.query_rules(domain_sql(domain).rules_active).await
  }

  async fn list_rules(&self, domain: Domain) -> Result<Vec<ConversionRule>> {
    self.query_rules(domain_sql(domain).rules_all).await
  }

  async fn add_rule(&self, domain: Domain, rule: NewRule) -> Result<ConversionRule> {
    rule.validate().map_err(Error::Core)?;

    let now = Utc::now();
    let now_str = encode_dt(now);
    let sql = domain_sql(domain).rule_insert;
    let insert_rule = rule.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          sql,
          rusqlite::params![
            insert_rule.source_name,
            insert_rule.target_id,
            insert_rule.target_name,
            insert_rule.confidence,
            now_str,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ConversionRule {
      id,
      source_name: rule.source_name,
      target_id: rule.target_id,
      target_name: rule.target_name,
      confidence: rule.confidence,
      is_active: true,
      created_at: now,
      updated_at: now,
    })
  }

  async fn deactivate_rule(&self, domain: Domain, rule_id: i64) -> Result<()> {
    let sql = domain_sql(domain).rule_deactivate;
    let now_str = encode_dt(Utc::now());

    let affected: usize = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![rule_id, now_str])?))
      .await?;

    if affected == 0 {
      return Err(Error::RuleNotFound(rule_id));
    }
    Ok(())
  }

  // ── Products ──────────────────────────────────────────────────────────────

  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
    // Build WHERE clause dynamically; all bound values are TEXT.
    let mut conds: Vec<String> = Vec::new();
    let mut bind: Vec<String> = Vec::new();

    fn push_like(
      column: &str,
      pattern: Option<&str>,
      conds: &mut Vec<String>,
      bind: &mut Vec<String>,
    ) {
      if let Some(p) = pattern {
        bind.push(p.replace('*', "%"));
        conds.push(format!("{column} LIKE ?{}", bind.len()));
      }
    }

    push_like("display_name", filter.display_name_pattern.as_deref(), &mut conds, &mut bind);
    push_like("color_name", filter.color_name_pattern.as_deref(), &mut conds, &mut bind);
    push_like("size_name", filter.size_name_pattern.as_deref(), &mut conds, &mut bind);

    match filter.has_color_id {
      Some(true) => conds.push("color_id IS NOT NULL".to_string()),
      Some(false) => conds.push("color_id IS NULL".to_string()),
      None => {}
    }
    match filter.has_size_id {
      Some(true) => conds.push("size_id IS NOT NULL".to_string()),
      Some(false) => conds.push("size_id IS NULL".to_string()),
      None => {}
    }

    if let Some(after) = filter.created_after {
      bind.push(encode_dt(after));
      conds.push(format!("created_at >= ?{}", bind.len()));
    }
    if let Some(before) = filter.created_before {
      bind.push(encode_dt(before));
      conds.push(format!("created_at <= ?{}", bind.len()));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let limit = filter.limit.unwrap_or(1000);
    let offset = filter.offset.unwrap_or(0);

    let sql = format!(
      "SELECT record_id, display_name, color_name, size_name, composite_value, \
         color_id, size_id, created_at, updated_at \
       FROM products {where_clause} \
       ORDER BY record_id LIMIT {limit} OFFSET {offset}"
    );

    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(bind), |row| {
            Ok(RawProduct {
              record_id:       row.get(0)?,
              display_name:    row.get(1)?,
              color_name:      row.get(2)?,
              size_name:       row.get(3)?,
              composite_value: row.get(4)?,
              color_id:        row.get(5)?,
              size_id:         row.get(6)?,
              created_at:      row.get(7)?,
              updated_at:      row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  // ── History — append-only ─────────────────────────────────────────────────

  async fn record_history(&self, entry: NewHistory) -> Result<ConversionHistory> {
    let now = Utc::now();
    let now_str = encode_dt(now);
    let insert_entry = entry.clone();
    let kind_str = encode_kind(entry.kind).to_owned();
    let status_str = encode_status(entry.status).to_owned();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO conversion_history (
             record_id, original_value, resolved_color_id, resolved_size_id,
             kind, status, confidence, error_message, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            insert_entry.record_id,
            insert_entry.original_value,
            insert_entry.resolved_color_id,
            insert_entry.resolved_size_id,
            kind_str,
            status_str,
            insert_entry.confidence,
            insert_entry.error_message,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ConversionHistory {
      id,
      record_id: entry.record_id,
      original_value: entry.original_value,
      resolved_color_id: entry.resolved_color_id,
      resolved_size_id: entry.resolved_size_id,
      kind: entry.kind,
      status: entry.status,
      confidence: entry.confidence,
      error_message: entry.error_message,
      created_at: now,
    })
  }

  async fn list_history(&self, limit: usize) -> Result<Vec<ConversionHistory>> {
    let limit = limit as i64;

    let raws: Vec<RawHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, record_id, original_value, resolved_color_id, resolved_size_id, \
             kind, status, confidence, error_message, created_at \
           FROM conversion_history ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawHistory {
              id:                row.get(0)?,
              record_id:         row.get(1)?,
              original_value:    row.get(2)?,
              resolved_color_id: row.get(3)?,
              resolved_size_id:  row.get(4)?,
              kind:              row.get(5)?,
              status:            row.get(6)?,
              confidence:        row.get(7)?,
              error_message:     row.get(8)?,
              created_at:        row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistory::into_history).collect()
  }

  // ── Assignment upserts ────────────────────────────────────────────────────

  async fn write_colors(&self, products: &[Product]) -> Result<WriteSummary> {
    self.write_assignments(Domain::Color, products).await
  }

  async fn write_sizes(&self, products: &[Product]) -> Result<WriteSummary> {
    self.write_assignments(Domain::Size, products).await
  }

  async fn list_recent_assignments(
    &self,
    domain: Domain,
    limit: usize,
  ) -> Result<Vec<Assignment>> {
    let sql = domain_sql(domain).assign_recent;
    let limit = limit as i64;

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawAssignment {
              record_id:    row.get(0)?,
              display_name: row.get(1)?,
              source_name:  row.get(2)?,
              target_id:    row.get(3)?,
              created_at:   row.get(4)?,
              updated_at:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }
}

// ─── Shared rule query ───────────────────────────────────────────────────────

impl SqliteStore {
  async fn query_rules(&self, sql: &'static str) -> Result<Vec<ConversionRule>> {
    let raws: Vec<RawRule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRule {
              id:          row.get(0)?,
              source_name: row.get(1)?,
              target_id:   row.get(2)?,
              target_name: row.get(3)?,
              confidence:  row.get(4)?,
              is_active:   row.get(5)?,
              created_at:  row.get(6)?,
              updated_at:  row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRule::into_rule).collect()
  }
}
