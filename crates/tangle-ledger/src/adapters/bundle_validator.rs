//! Structural bundle validator
//!
//! Checks everything about a bundle except its signatures:
//!
//! 1. the entry point is a tail (`current_index == 0`)
//! 2. the trunk chain yields contiguous indices ending at `last_index`
//! 3. running value sums stay within the supply and end at zero
//! 4. the Sha3-256 of the essences reproduces the bundle hash

use std::sync::Arc;

use shared_types::{compute_bundle_hash, Hash, Transaction, TOTAL_SUPPLY};
use tracing::debug;

use crate::error::LedgerResult;
use crate::ports::outbound::{BundleValidator, TransactionStore};

pub struct StructuralBundleValidator {
    transactions: Arc<dyn TransactionStore>,
}

impl StructuralBundleValidator {
    pub fn new(transactions: Arc<dyn TransactionStore>) -> Self {
        Self { transactions }
    }

    /// Follow the trunk from `tail` while the bundle hash matches.
    fn load_bundle(&self, tail: Transaction) -> LedgerResult<Vec<Transaction>> {
        let expected = tail.last_index.saturating_add(1);
        let mut bundle = vec![tail];
        while let Some(last) = bundle.last() {
            if (bundle.len() as u64) >= expected || last.is_head() {
                break;
            }
            let next = self.transactions.load(&last.trunk)?;
            if next.is_prefilled() || next.bundle != last.bundle {
                break;
            }
            bundle.push(next);
        }
        Ok(bundle)
    }
}

fn validate_order(bundle: &[Transaction]) -> Result<(), String> {
    let Some(tail) = bundle.first() else {
        return Err("bundle is empty".to_string());
    };
    for (position, tx) in bundle.iter().enumerate() {
        if tx.current_index != position as u64 {
            return Err(format!(
                "transaction {} has index {}, expected {}",
                tx.hash, tx.current_index, position
            ));
        }
        if tx.last_index != tail.last_index {
            return Err(format!("transaction {} disagrees on last index", tx.hash));
        }
    }
    for pair in bundle.windows(2) {
        if pair[0].trunk != pair[1].hash {
            return Err(format!("trunk of {} should be {}", pair[0].hash, pair[1].hash));
        }
    }
    let expected = tail.last_index.saturating_add(1);
    if bundle.len() as u64 != expected {
        return Err(format!("bundle is incomplete, expected {expected} transactions"));
    }
    Ok(())
}

fn validate_value(bundle: &[Transaction]) -> Result<(), String> {
    let mut running: i64 = 0;
    for tx in bundle {
        running = running
            .checked_add(tx.value)
            .ok_or_else(|| "bundle value overflow".to_string())?;
        if !(-TOTAL_SUPPLY..=TOTAL_SUPPLY).contains(&running) {
            return Err("bundle value exceeds the supply".to_string());
        }
    }
    if running != 0 {
        return Err("bundle values do not sum to zero".to_string());
    }
    Ok(())
}

fn validate_bundle_hash(bundle: &[Transaction]) -> Result<(), String> {
    let Some(tail) = bundle.first() else {
        return Err("bundle is empty".to_string());
    };
    let computed = compute_bundle_hash(bundle);
    if computed != tail.bundle {
        return Err(format!(
            "bundle hash {} does not match computed {}",
            tail.bundle, computed
        ));
    }
    Ok(())
}

impl BundleValidator for StructuralBundleValidator {
    fn validate(&self, tail: &Hash) -> LedgerResult<Vec<Vec<Transaction>>> {
        let tail_tx = self.transactions.load(tail)?;
        if tail_tx.is_prefilled() || !tail_tx.is_tail() {
            return Ok(Vec::new());
        }

        let bundle = self.load_bundle(tail_tx)?;
        let checked = validate_order(&bundle)
            .and_then(|_| validate_value(&bundle))
            .and_then(|_| validate_bundle_hash(&bundle));

        match checked {
            Ok(()) => Ok(vec![bundle]),
            Err(reason) => {
                debug!(tail = %tail, %reason, "Bundle rejected");
                Ok(Vec::new())
            }
        }
    }
}
