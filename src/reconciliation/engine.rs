//! Greedy transaction-to-receipt assignment, classification, and assembly

use std::collections::HashSet;

use uuid::Uuid;

use crate::reconciliation::config::MatchConfig;
use crate::reconciliation::scoring::{amount_score, date_proximity_score, weighted_confidence};
use crate::reconciliation::similarity::merchant_similarity;
use crate::types::{
    MatchOutcome, MatchResult, MatchStatus, MatchingFactors, MatchingResult, Receipt, Transaction,
};
use crate::utils::cancellation::CancellationToken;
use crate::utils::validation::{validate_receipts, validate_transaction};

/// Best available receipt for one transaction, with its factor breakdown
struct Candidate<'a> {
    receipt: &'a Receipt,
    confidence: f64,
    amount_match: f64,
    date_proximity: f64,
    merchant_match: f64,
}

/// Matching engine reconciling one session's transactions against receipts
///
/// The engine is stateless across runs: configuration is validated once at
/// construction and each invocation owns its own consumed-receipt set, so
/// runs for different sessions can execute concurrently on separate threads.
pub struct ReconciliationEngine {
    config: MatchConfig,
}

impl ReconciliationEngine {
    /// Create an engine with a validated configuration
    pub fn new(config: MatchConfig) -> MatchingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with the standard configuration
    pub fn with_defaults() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match every transaction against the available receipts
    ///
    /// Returns one result per transaction, preserving transaction input
    /// order. Earlier transactions have first claim on contested receipts.
    pub fn match_session(
        &self,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> MatchOutcome {
        self.match_session_with_cancellation(transactions, receipts, &CancellationToken::new())
    }

    /// Match a session, checking the cancellation token between transactions
    ///
    /// On cancellation the results computed so far are returned with
    /// `complete` set to false; the caller decides whether to keep them.
    pub fn match_session_with_cancellation(
        &self,
        transactions: &[Transaction],
        receipts: &[Receipt],
        cancel: &CancellationToken,
    ) -> MatchOutcome {
        let mut warnings = Vec::new();
        let receipt_pool = validate_receipts(receipts, &mut warnings);

        let mut consumed: HashSet<Uuid> = HashSet::new();
        let mut results = Vec::with_capacity(transactions.len());

        for transaction in transactions {
            if cancel.is_cancelled() {
                tracing::warn!(
                    processed = results.len(),
                    total = transactions.len(),
                    "Matching run cancelled"
                );
                return MatchOutcome {
                    results,
                    warnings,
                    complete: false,
                };
            }

            if let Err(warning) = validate_transaction(transaction) {
                tracing::warn!(
                    transaction_id = %transaction.id,
                    message = %warning.message,
                    "Skipping malformed transaction"
                );
                warnings.push(warning);
                results.push(self.unmatched_result(
                    transaction.id,
                    "Transaction failed input validation".to_string(),
                ));
                continue;
            }

            let best = self.find_best_candidate(transaction, &receipt_pool, &consumed);
            results.push(self.classify(transaction, best, &mut consumed));
        }

        let outcome = MatchOutcome {
            results,
            warnings,
            complete: true,
        };

        let summary = outcome.summary();
        tracing::info!(
            total = summary.total,
            matched = summary.matched,
            manual_review = summary.manual_review,
            unmatched = summary.unmatched,
            "Matching run complete"
        );

        outcome
    }

    /// Scan the unconsumed receipts for the best-scoring candidate
    ///
    /// A candidate is kept only on strictly greater confidence than the
    /// running best, so ties resolve to the earliest-listed receipt and a
    /// zero-confidence candidate is never preferred over no candidate at all.
    fn find_best_candidate<'a>(
        &self,
        transaction: &Transaction,
        receipt_pool: &[&'a Receipt],
        consumed: &HashSet<Uuid>,
    ) -> Option<Candidate<'a>> {
        let mut best: Option<Candidate<'a>> = None;
        let mut best_confidence = 0.0;

        for &receipt in receipt_pool {
            if consumed.contains(&receipt.id) {
                continue;
            }

            let amount_match = amount_score(
                &transaction.amount,
                &receipt.amount,
                &self.config.amount_tolerance,
            );
            let date_proximity = date_proximity_score(
                transaction.date,
                receipt.date,
                self.config.date_window_days,
            );
            let merchant_match =
                merchant_similarity(&transaction.merchant_name, &receipt.vendor_name);

            let confidence = weighted_confidence(
                amount_match,
                date_proximity,
                merchant_match,
                &self.config.weights,
            );

            if confidence > best_confidence {
                best_confidence = confidence;
                best = Some(Candidate {
                    receipt,
                    confidence,
                    amount_match,
                    date_proximity,
                    merchant_match,
                });
            }
        }

        best
    }

    /// Classify the best candidate and assemble the final result
    ///
    /// Only an automatic match consumes the receipt. A manual-review
    /// candidate stays in the pool, so a later transaction may independently
    /// report the same receipt as its own best candidate.
    fn classify(
        &self,
        transaction: &Transaction,
        best: Option<Candidate<'_>>,
        consumed: &mut HashSet<Uuid>,
    ) -> MatchResult {
        let Some(candidate) = best else {
            return self.unmatched_result(
                transaction.id,
                "No matching receipt found".to_string(),
            );
        };

        let (status, reason) = if candidate.confidence >= self.config.confidence_threshold {
            consumed.insert(candidate.receipt.id);
            (
                MatchStatus::Matched,
                format!(
                    "Matched with {:.1}% confidence",
                    candidate.confidence * 100.0
                ),
            )
        } else {
            (
                MatchStatus::ManualReview,
                format!(
                    "Confidence {:.1}% is below the {:.1}% threshold, manual review required",
                    candidate.confidence * 100.0,
                    self.config.confidence_threshold * 100.0
                ),
            )
        };

        tracing::debug!(
            transaction_id = %transaction.id,
            receipt_id = %candidate.receipt.id,
            confidence = candidate.confidence,
            status = ?status,
            "Classified transaction"
        );

        let amount_difference = (&transaction.amount - &candidate.receipt.amount).abs();
        let date_difference_days = (transaction.date - candidate.receipt.date).num_days().abs();

        MatchResult {
            transaction_id: transaction.id,
            receipt_id: Some(candidate.receipt.id),
            confidence_score: round_confidence(candidate.confidence),
            match_status: status,
            match_reason: reason,
            amount_difference: Some(amount_difference),
            date_difference_days: Some(date_difference_days),
            merchant_similarity: Some(candidate.merchant_match),
            matching_factors: Some(MatchingFactors {
                amount_match: candidate.amount_match,
                date_proximity: candidate.date_proximity,
                merchant_match: candidate.merchant_match,
                weights: self.config.weights,
                algorithm_version: self.config.algorithm_version.clone(),
            }),
        }
    }

    fn unmatched_result(&self, transaction_id: Uuid, reason: String) -> MatchResult {
        MatchResult {
            transaction_id,
            receipt_id: None,
            confidence_score: 0.0,
            match_status: MatchStatus::Unmatched,
            match_reason: reason,
            amount_difference: None,
            date_difference_days: None,
            merchant_similarity: None,
            matching_factors: None,
        }
    }
}

/// Round a confidence value to four decimal places for the stored record
///
/// Classification always compares the unrounded value against the threshold;
/// rounding happens only at assembly time.
fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FactorWeights;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(amount: &str, date_: NaiveDate, merchant: &str) -> Transaction {
        Transaction::new(Uuid::new_v4(), dec(amount), date_, merchant.to_string())
    }

    fn receipt(amount: &str, date_: NaiveDate, vendor: &str) -> Receipt {
        Receipt::new(Uuid::new_v4(), dec(amount), date_, vendor.to_string())
    }

    #[test]
    fn test_perfect_match_scores_full_confidence() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![receipt("100.00", date(2025, 3, 1), "CHEVRON 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.confidence_score, 1.0);
        assert_eq!(result.receipt_id, Some(receipts[0].id));
        assert_eq!(result.amount_difference, Some(dec("0.00")));
        assert_eq!(result.date_difference_days, Some(0));
        assert!(result.match_reason.contains("100.0%"));
    }

    #[test]
    fn test_no_receipts_yields_unmatched() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &[]);

        let result = &outcome.results[0];
        assert_eq!(result.match_status, MatchStatus::Unmatched);
        assert_eq!(result.receipt_id, None);
        assert_eq!(result.confidence_score, 0.0);
        assert!(result.matching_factors.is_none());
    }

    #[test]
    fn test_higher_merchant_similarity_wins() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![
            receipt("50.00", date(2025, 3, 1), "Quick Mart"),
            receipt("50.00", date(2025, 3, 1), "Chevron 123"),
        ];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].receipt_id, Some(receipts[1].id));
    }

    #[test]
    fn test_exact_tie_keeps_earlier_receipt() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![
            receipt("50.00", date(2025, 3, 1), "Chevron 123"),
            receipt("50.00", date(2025, 3, 1), "Chevron 123"),
        ];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].receipt_id, Some(receipts[0].id));
    }

    #[test]
    fn test_large_amount_difference_routes_to_manual_review() {
        let engine = ReconciliationEngine::with_defaults();
        // Amount differs by half the transaction amount, date and merchant perfect
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![receipt("50.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        let result = &outcome.results[0];
        assert_eq!(result.match_status, MatchStatus::ManualReview);
        assert_eq!(result.receipt_id, Some(receipts[0].id));
        assert!(result.confidence_score < 0.7);
        assert!(result.match_reason.contains("manual review"));
    }

    #[test]
    fn test_matched_receipt_is_consumed() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
        ];
        let receipts = vec![receipt("100.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].match_status, MatchStatus::Matched);
        assert_eq!(outcome.results[1].match_status, MatchStatus::Unmatched);
        assert_eq!(outcome.results[1].receipt_id, None);
    }

    #[test]
    fn test_manual_review_candidate_stays_available() {
        let engine = ReconciliationEngine::with_defaults();
        // Both transactions score the same weak candidate below the threshold
        let transactions = vec![
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
        ];
        let receipts = vec![receipt("50.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].match_status, MatchStatus::ManualReview);
        assert_eq!(outcome.results[1].match_status, MatchStatus::ManualReview);
        assert_eq!(outcome.results[0].receipt_id, Some(receipts[0].id));
        assert_eq!(outcome.results[1].receipt_id, Some(receipts[0].id));
    }

    #[test]
    fn test_earlier_transaction_has_first_claim() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![
            // First transaction is a weaker fit for the receipt than the second,
            // but greedy order gives it first claim anyway.
            transaction("100.00", date(2025, 3, 2), "Chevron"),
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
        ];
        let receipts = vec![receipt("100.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].match_status, MatchStatus::Matched);
        assert_eq!(outcome.results[0].receipt_id, Some(receipts[0].id));
        assert_eq!(outcome.results[1].match_status, MatchStatus::Unmatched);
    }

    #[test]
    fn test_malformed_transaction_warns_and_stays_unmatched() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("-10.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![receipt("10.00", date(2025, 3, 1), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].match_status, MatchStatus::Unmatched);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].record_id, transactions[0].id);
    }

    #[test]
    fn test_malformed_receipt_is_excluded_from_pool() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let bad_receipt = receipt("0.00", date(2025, 3, 1), "Chevron 123");
        let receipts = vec![bad_receipt.clone()];

        let outcome = engine.match_session(&transactions, &receipts);

        assert_eq!(outcome.results[0].match_status, MatchStatus::Unmatched);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].record_id, bad_receipt.id);
    }

    #[test]
    fn test_cancellation_returns_partial_results() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![
            transaction("100.00", date(2025, 3, 1), "Chevron 123"),
            transaction("200.00", date(2025, 3, 2), "Shell"),
        ];
        let receipts = vec![receipt("100.00", date(2025, 3, 1), "Chevron 123")];

        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = engine.match_session_with_cancellation(&transactions, &receipts, &cancel);

        assert!(!outcome.is_complete());
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_results_preserve_transaction_order() {
        let engine = ReconciliationEngine::with_defaults();
        let transactions = vec![
            transaction("10.00", date(2025, 3, 1), "Alpha"),
            transaction("20.00", date(2025, 3, 2), "Beta"),
            transaction("30.00", date(2025, 3, 3), "Gamma"),
        ];
        let receipts = vec![receipt("20.00", date(2025, 3, 2), "Beta")];

        let outcome = engine.match_session(&transactions, &receipts);

        let ids: Vec<Uuid> = outcome.results.iter().map(|r| r.transaction_id).collect();
        let expected: Vec<Uuid> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let config = MatchConfig {
            confidence_threshold: 2.0,
            ..MatchConfig::default()
        };
        assert!(ReconciliationEngine::new(config).is_err());
    }

    #[test]
    fn test_factor_breakdown_records_configuration() {
        let config = MatchConfig {
            algorithm_version: "v2.1".to_string(),
            ..MatchConfig::default()
        };
        let engine = ReconciliationEngine::new(config).unwrap();
        let transactions = vec![transaction("100.00", date(2025, 3, 1), "Chevron 123")];
        let receipts = vec![receipt("100.00", date(2025, 3, 2), "Chevron 123")];

        let outcome = engine.match_session(&transactions, &receipts);

        let factors = outcome.results[0].matching_factors.as_ref().unwrap();
        assert_eq!(factors.algorithm_version, "v2.1");
        assert_eq!(factors.amount_match, 1.0);
        assert!(factors.date_proximity < 1.0);
        assert_eq!(factors.weights, FactorWeights::standard());
    }

    #[test]
    fn test_round_confidence_to_four_places() {
        assert_eq!(round_confidence(0.123456), 0.1235);
        assert_eq!(round_confidence(0.7), 0.7);
        assert_eq!(round_confidence(1.0), 1.0);
    }
}
