//! # Reconciliation Core
//!
//! A matching engine that reconciles credit-card transactions against
//! scanned receipts for expense auditing.
//!
//! ## Features
//!
//! - **Multi-factor scoring**: amount, date proximity, and merchant
//!   similarity factors combined with configurable weights
//! - **Greedy one-to-one assignment**: each receipt is committed to at most
//!   one matched transaction, with deterministic first-claim ordering
//! - **Threshold classification**: matched, manual review, or unmatched,
//!   with a human-readable reason on every result
//! - **Auditable provenance**: every result embeds its factor breakdown,
//!   weights, and algorithm version
//! - **Malformed-input warnings**: bad records produce per-record warnings
//!   instead of aborting the run
//! - **Cooperative cancellation**: long runs can be aborted cleanly between
//!   transactions
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{ReconciliationEngine, Transaction, Receipt};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//! use std::str::FromStr;
//! use uuid::Uuid;
//!
//! let engine = ReconciliationEngine::with_defaults();
//!
//! let transactions = vec![Transaction::new(
//!     Uuid::new_v4(),
//!     BigDecimal::from_str("42.50").unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!     "Chevron 123".to_string(),
//! )];
//! let receipts = vec![Receipt::new(
//!     Uuid::new_v4(),
//!     BigDecimal::from_str("42.50").unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!     "CHEVRON 123".to_string(),
//! )];
//!
//! let outcome = engine.match_session(&transactions, &receipts);
//! assert_eq!(outcome.results.len(), 1);
//! ```

pub mod reconciliation;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use types::*;
pub use utils::*;
