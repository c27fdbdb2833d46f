//! Matching configuration and construction-time validation

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{FactorWeights, MatchingError, MatchingResult};

/// Tolerance when checking that the factor weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl FactorWeights {
    /// Default weights: amount dominates, then date, then merchant
    pub fn standard() -> Self {
        Self {
            amount: 0.5,
            date: 0.3,
            merchant: 0.2,
        }
    }

    /// Validate that the weights are non-negative and sum to 1.0
    pub fn validate(&self) -> MatchingResult<()> {
        if self.amount < 0.0 || self.date < 0.0 || self.merchant < 0.0 {
            return Err(MatchingError::Configuration(format!(
                "Factor weights must be non-negative: amount={}, date={}, merchant={}",
                self.amount, self.date, self.merchant
            )));
        }

        let sum = self.amount + self.date + self.merchant;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchingError::Configuration(format!(
                "Factor weights must sum to 1.0, got {}",
                sum
            )));
        }

        Ok(())
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self::standard()
    }
}

/// Immutable configuration for one reconciliation engine
///
/// Validated once at engine construction and never mutated mid-run, so every
/// result in a run is scored under the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Amount difference treated as a near-exact match
    pub amount_tolerance: BigDecimal,
    /// Day window treated as near proximity
    pub date_window_days: i64,
    /// Minimum confidence for an automatic match
    pub confidence_threshold: f64,
    /// Weights combining the three factor scores
    pub weights: FactorWeights,
    /// Version tag recorded in every result's factor breakdown
    pub algorithm_version: String,
}

impl MatchConfig {
    /// Validate the full configuration
    pub fn validate(&self) -> MatchingResult<()> {
        if self.amount_tolerance < BigDecimal::zero() {
            return Err(MatchingError::Configuration(format!(
                "Amount tolerance cannot be negative: {}",
                self.amount_tolerance
            )));
        }

        if self.date_window_days < 0 {
            return Err(MatchingError::Configuration(format!(
                "Date window cannot be negative: {}",
                self.date_window_days
            )));
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(MatchingError::Configuration(format!(
                "Confidence threshold must be within [0, 1]: {}",
                self.confidence_threshold
            )));
        }

        if self.algorithm_version.trim().is_empty() {
            return Err(MatchingError::Configuration(
                "Algorithm version cannot be empty".to_string(),
            ));
        }

        self.weights.validate()
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: BigDecimal::from_str("0.01").unwrap(),
            date_window_days: 3,
            confidence_threshold: 0.7,
            weights: FactorWeights::standard(),
            algorithm_version: "v1.0".to_string(),
        }
    }
}
