//! Input validation producing per-record warnings

use bigdecimal::{BigDecimal, Zero};

use crate::types::{InputWarning, Receipt, RecordKind, Transaction};

/// Validate a transaction against the input contract
///
/// A malformed transaction never aborts the run; the caller records the
/// warning and classifies the transaction as unmatched.
pub fn validate_transaction(transaction: &Transaction) -> Result<(), InputWarning> {
    if transaction.amount <= BigDecimal::zero() {
        return Err(InputWarning {
            kind: RecordKind::Transaction,
            record_id: transaction.id,
            message: format!("Transaction amount must be positive: {}", transaction.amount),
        });
    }

    Ok(())
}

/// Filter the receipt pool down to well-formed records
///
/// Receipts with a non-positive amount are dropped from the candidate pool
/// with a warning. A blank vendor name only warns, since the similarity
/// rules already score empty names as zero.
pub fn validate_receipts<'a>(
    receipts: &'a [Receipt],
    warnings: &mut Vec<InputWarning>,
) -> Vec<&'a Receipt> {
    let mut pool = Vec::with_capacity(receipts.len());

    for receipt in receipts {
        if receipt.amount <= BigDecimal::zero() {
            warnings.push(InputWarning {
                kind: RecordKind::Receipt,
                record_id: receipt.id,
                message: format!("Receipt amount must be positive: {}", receipt.amount),
            });
            continue;
        }

        if receipt.vendor_name.trim().is_empty() {
            warnings.push(InputWarning {
                kind: RecordKind::Receipt,
                record_id: receipt.id,
                message: "Receipt vendor name is blank".to_string(),
            });
        }

        pool.push(receipt);
    }

    pool
}
