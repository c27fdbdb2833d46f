//! Basic reconciliation example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use reconciliation_core::{Receipt, ReconciliationEngine, Transaction};
use std::str::FromStr;
use uuid::Uuid;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Reconciliation Core - Basic Matching Example\n");

    let engine = ReconciliationEngine::with_defaults();

    // 1. A small batch of statement transactions
    println!("💳 Statement transactions:");
    let transactions = vec![
        Transaction::new(
            Uuid::new_v4(),
            BigDecimal::from_str("42.50")?,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            "Chevron 123".to_string(),
        ),
        Transaction::new(
            Uuid::new_v4(),
            BigDecimal::from_str("18.20")?,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            "Starbucks #4411".to_string(),
        ),
        Transaction::new(
            Uuid::new_v4(),
            BigDecimal::from_str("9.99")?,
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            "Netflix.com".to_string(),
        ),
    ];
    for tx in &transactions {
        println!("  • {} on {} at {}", tx.amount, tx.date, tx.merchant_name);
    }

    // 2. The receipts the employee uploaded
    println!("\n🧾 Uploaded receipts:");
    let receipts = vec![
        Receipt::new(
            Uuid::new_v4(),
            BigDecimal::from_str("42.50")?,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            "CHEVRON 123".to_string(),
        ),
        Receipt::new(
            Uuid::new_v4(),
            BigDecimal::from_str("18.20")?,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            "Starbucks".to_string(),
        ),
    ];
    for receipt in &receipts {
        println!(
            "  • {} on {} from {}",
            receipt.amount, receipt.date, receipt.vendor_name
        );
    }

    // 3. Run the matching engine
    println!("\n🔍 Matching...\n");
    let outcome = engine.match_session(&transactions, &receipts);

    for result in &outcome.results {
        println!(
            "  {:?} ({:.1}% confidence): {}",
            result.match_status,
            result.confidence_score * 100.0,
            result.match_reason
        );
        if let Some(factors) = &result.matching_factors {
            println!(
                "    amount={:.3} date={:.3} merchant={:.3}",
                factors.amount_match, factors.date_proximity, factors.merchant_match
            );
        }
    }

    // 4. Run summary
    let summary = outcome.summary();
    println!(
        "\n📊 Summary: {} matched, {} manual review, {} unmatched ({:.0}% match rate)",
        summary.matched,
        summary.manual_review,
        summary.unmatched,
        summary.match_rate * 100.0
    );

    Ok(())
}
