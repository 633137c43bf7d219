//! Bundle-backed candidate verifier
//!
//! An application bundle is signed by the validator it replaces (the tail's
//! address), which must be in the current set. Its last transaction
//! announces the replacement address in the first 32 bytes of its signature
//! region.
//!
//! ```text
//! index:   0 .. security    security+1 ..
//!          signature txs    head   (application last)
//! branch:  == head.trunk
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use shared_types::{Address, Transaction};
use tangle_ledger::BundleValidator;
use tracing::{debug, warn};

use crate::config::SignatureMode;
use crate::domain::CandidateValidity;
use crate::error::ValidatorManagerResult;
use crate::ports::outbound::{CandidateVerifier, SignatureScheme};

pub struct BundleCandidateVerifier {
    bundle_validator: Arc<dyn BundleValidator>,
    signatures: Arc<dyn SignatureScheme>,
}

impl BundleCandidateVerifier {
    pub fn new(bundle_validator: Arc<dyn BundleValidator>, signatures: Arc<dyn SignatureScheme>) -> Self {
        Self {
            bundle_validator,
            signatures,
        }
    }
}

impl CandidateVerifier for BundleCandidateVerifier {
    fn validate_candidate(
        &self,
        tail: &Transaction,
        mode: SignatureMode,
        security: u64,
        validators: &BTreeSet<Address>,
    ) -> ValidatorManagerResult<CandidateValidity> {
        let bundles = self.bundle_validator.validate(&tail.hash)?;
        if bundles.is_empty() {
            return Ok(CandidateValidity::Incomplete);
        }

        for bundle in &bundles {
            if bundle.first().map(|tx| tx.hash) != Some(tail.hash) {
                continue;
            }
            if !has_candidate_structure(bundle, security) {
                debug!(tail = %tail.hash, security, "Application bundle has the wrong structure");
                continue;
            }
            let Some(application) = bundle.last() else {
                continue;
            };
            let announced = match self.derive_address_from_signature(application) {
                Ok(address) => address,
                Err(e) => {
                    debug!(tail = %tail.hash, error = %e, "Application carries no address");
                    return Ok(CandidateValidity::Invalid);
                }
            };
            if validators.contains(&announced) {
                return Ok(CandidateValidity::AlreadyProcessed);
            }
            if !validators.contains(&tail.address) {
                debug!(tail = %tail.hash, signer = %tail.address, "Application signer is not a validator");
                return Ok(CandidateValidity::Invalid);
            }
            if self
                .signatures
                .verify_bundle(bundle, mode, &tail.address, security)
            {
                return Ok(CandidateValidity::Valid);
            }
            return Ok(CandidateValidity::Invalid);
        }
        Ok(CandidateValidity::Invalid)
    }
}

/// More than `security + 1` transactions, and every signature transaction
/// branches to the head's trunk.
fn has_candidate_structure(bundle: &[Transaction], security: u64) -> bool {
    let Ok(head_index) = usize::try_from(security.saturating_add(1)) else {
        return false;
    };
    let Some(head) = bundle.get(head_index) else {
        return false;
    };
    bundle[..head_index]
        .iter()
        .all(|tx| tx.branch == head.trunk)
}

/// Accepts every signature. Development networks only.
#[derive(Debug)]
pub struct UncheckedSignatures;

impl UncheckedSignatures {
    pub fn new() -> Self {
        warn!("Candidate signature verification is disabled");
        Self
    }
}

impl Default for UncheckedSignatures {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureScheme for UncheckedSignatures {
    fn verify_bundle(
        &self,
        _bundle: &[Transaction],
        _mode: SignatureMode,
        _signer: &Address,
        _security: u64,
    ) -> bool {
        true
    }
}
