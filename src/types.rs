//! Core types and data structures for transaction-to-receipt reconciliation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A credit-card transaction extracted from a statement
///
/// Transactions are owned by the extraction subsystem; the matching engine
/// only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: Uuid,
    /// Transaction amount (positive, two decimal places)
    pub amount: BigDecimal,
    /// Date the transaction was posted
    pub date: NaiveDate,
    /// Merchant name as it appears on the statement
    pub merchant_name: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(id: Uuid, amount: BigDecimal, date: NaiveDate, merchant_name: String) -> Self {
        Self {
            id,
            amount,
            date,
            merchant_name,
        }
    }
}

/// A scanned receipt extracted from an uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier for the receipt
    pub id: Uuid,
    /// Receipt total (positive, two decimal places)
    pub amount: BigDecimal,
    /// Date printed on the receipt
    pub date: NaiveDate,
    /// Vendor name as printed on the receipt
    pub vendor_name: String,
}

impl Receipt {
    /// Create a new receipt
    pub fn new(id: Uuid, amount: BigDecimal, date: NaiveDate, vendor_name: String) -> Self {
        Self {
            id,
            amount,
            date,
            vendor_name,
        }
    }
}

/// Terminal classification of one transaction's matching outcome
///
/// A downstream review workflow may later override the stored status; those
/// transitions happen outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// A receipt was found with confidence at or above the configured threshold
    Matched,
    /// A candidate receipt exists but confidence is too low to auto-match
    ManualReview,
    /// No candidate receipt was available
    Unmatched,
}

/// Weights applied to the individual factor scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    /// Weight of the amount score
    pub amount: f64,
    /// Weight of the date proximity score
    pub date: f64,
    /// Weight of the merchant similarity score
    pub merchant: f64,
}

/// Factor-level breakdown embedded in every result for score provenance
///
/// Storing the weights and algorithm version alongside the scores keeps old
/// results reproducible after the scoring configuration changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingFactors {
    /// Amount factor score in [0, 1]
    pub amount_match: f64,
    /// Date proximity factor score in [0, 1]
    pub date_proximity: f64,
    /// Merchant similarity factor score in [0, 1]
    pub merchant_match: f64,
    /// Weights in effect when the scores were combined
    pub weights: FactorWeights,
    /// Version tag of the scoring algorithm
    pub algorithm_version: String,
}

/// Outcome of matching one transaction against the available receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Transaction this result belongs to
    pub transaction_id: Uuid,
    /// Chosen receipt, if any candidate was available
    pub receipt_id: Option<Uuid>,
    /// Weighted confidence in [0, 1], rounded to four decimal places
    pub confidence_score: f64,
    /// Terminal classification of the outcome
    pub match_status: MatchStatus,
    /// Human-readable explanation of the classification
    pub match_reason: String,
    /// Absolute amount difference against the candidate receipt
    pub amount_difference: Option<BigDecimal>,
    /// Absolute day difference against the candidate receipt
    pub date_difference_days: Option<i64>,
    /// Merchant similarity against the candidate receipt
    pub merchant_similarity: Option<f64>,
    /// Factor breakdown for audit and debugging
    pub matching_factors: Option<MatchingFactors>,
}

/// Kind of input record a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Transaction,
    Receipt,
}

/// Warning about a malformed input record
///
/// Malformed records never abort a run; the engine scores around them and
/// surfaces the problem to the caller through these warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputWarning {
    /// Whether the record is a transaction or a receipt
    pub kind: RecordKind,
    /// Identifier of the offending record
    pub record_id: Uuid,
    /// What was wrong with it
    pub message: String,
}

/// Complete output of one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// One result per input transaction, in input order
    pub results: Vec<MatchResult>,
    /// Warnings for malformed input records
    pub warnings: Vec<InputWarning>,
    /// False when the run was cancelled before processing every transaction
    pub complete: bool,
}

impl MatchOutcome {
    /// Whether every transaction was processed
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Aggregate status counts for the run
    pub fn summary(&self) -> MatchSummary {
        let matched = self
            .results
            .iter()
            .filter(|r| r.match_status == MatchStatus::Matched)
            .count();
        let manual_review = self
            .results
            .iter()
            .filter(|r| r.match_status == MatchStatus::ManualReview)
            .count();
        let unmatched = self
            .results
            .iter()
            .filter(|r| r.match_status == MatchStatus::Unmatched)
            .count();
        let total = self.results.len();

        let match_rate = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64
        };

        MatchSummary {
            total,
            matched,
            manual_review,
            unmatched,
            match_rate,
        }
    }
}

/// Aggregate statistics over one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Number of transactions processed
    pub total: usize,
    /// Results classified as matched
    pub matched: usize,
    /// Results routed to manual review
    pub manual_review: usize,
    /// Results with no candidate receipt
    pub unmatched: usize,
    /// Fraction of transactions that matched, 0.0 for an empty run
    pub match_rate: f64,
}

/// Errors that can occur in the reconciliation engine
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Result type for reconciliation operations
pub type MatchingResult<T> = Result<T, MatchingError>;
