//! Reconciliation module matching credit-card transactions to scanned receipts

pub mod config;
pub mod engine;
pub mod scoring;
pub mod similarity;

pub use config::*;
pub use engine::*;
pub use scoring::*;
pub use similarity::*;
