//! Batch conversion and registration over any
//! [`ConversionStore`](weft_core::store::ConversionStore).
//!
//! This crate owns the orchestration that the storage layer deliberately
//! does not: iterating a product batch, resolving names through the rule
//! sets, applying the confidence threshold, tracing every attempt to the
//! history table, and pushing resolved assignments into the target tables.

pub mod collector;
pub mod convert;
pub mod error;
pub mod register;
pub mod seed;

pub use collector::ErrorCollector;
pub use convert::{BatchOptions, resolve_composite_value, resolve_name, run_batch};
pub use error::{Error, Result};
pub use register::{RegisterOptions, ValidationReport, batch_insert, validate_products};
pub use seed::seed_default_rules;
