//! Pure factor scorers and the weighted confidence combinator

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDate;

use crate::types::FactorWeights;

/// Score how closely two amounts agree, in [0, 1]
///
/// The difference is computed in exact decimal arithmetic so that equality is
/// exact. Within the tolerance the score decays linearly from 1.0 to 0.9;
/// beyond it the score decays with the relative difference, so a few cents on
/// a large amount still scores well while the same cents on a small amount
/// does not.
pub fn amount_score(
    transaction_amount: &BigDecimal,
    receipt_amount: &BigDecimal,
    tolerance: &BigDecimal,
) -> f64 {
    let diff = (transaction_amount - receipt_amount).abs();

    if diff.is_zero() {
        return 1.0;
    }

    if diff <= *tolerance {
        // Reachable only with a positive tolerance, since diff > 0 here.
        let ratio = (&diff / tolerance).to_f64().unwrap_or(1.0);
        return 1.0 - ratio * 0.1;
    }

    let average = (transaction_amount + receipt_amount) / BigDecimal::from(2);
    if average.is_zero() {
        return 0.0;
    }

    let percent_diff = (&diff / &average).abs().to_f64().unwrap_or(f64::MAX);
    (1.0 / (1.0 + percent_diff * 10.0)).max(0.0)
}

/// Score how close two dates are, in [0, 1]
///
/// Same day scores 1.0. Inside the window the score decays linearly to 0.7 at
/// the window boundary; past the window it tails off toward zero.
pub fn date_proximity_score(
    transaction_date: NaiveDate,
    receipt_date: NaiveDate,
    window_days: i64,
) -> f64 {
    let day_diff = (transaction_date - receipt_date).num_days().abs();

    if day_diff == 0 {
        return 1.0;
    }

    if day_diff <= window_days {
        return 1.0 - (day_diff as f64 / window_days as f64) * 0.3;
    }

    let overshoot = (day_diff - window_days) as f64;
    (0.7 / (1.0 + overshoot * 0.5)).max(0.0)
}

/// Combine factor scores into a single confidence value in [0, 1]
///
/// The weights are validated at engine construction to sum to 1.0, so the
/// clamp only guards against float drift.
pub fn weighted_confidence(
    amount: f64,
    date: f64,
    merchant: f64,
    weights: &FactorWeights,
) -> f64 {
    let confidence =
        amount * weights.amount + date * weights.date + merchant * weights.merchant;
    confidence.clamp(0.0, 1.0)
}
