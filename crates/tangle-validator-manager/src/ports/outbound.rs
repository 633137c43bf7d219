//! Driven Ports (SPI - Outbound Dependencies)

use std::collections::BTreeSet;

use shared_types::{Address, Hash, HashKind, RoundIndex, Transaction};

use crate::config::SignatureMode;
use crate::domain::CandidateValidity;
use crate::error::{ValidatorManagerError, ValidatorManagerResult};

/// Judges an application bundle.
pub trait CandidateVerifier: Send + Sync {
    /// Verdict on the bundle starting at `tail`.
    fn validate_candidate(
        &self,
        tail: &Transaction,
        mode: SignatureMode,
        security: u64,
        validators: &BTreeSet<Address>,
    ) -> ValidatorManagerResult<CandidateValidity>;

    /// Address announced in the first hash of a signature region.
    fn derive_address_from_signature(
        &self,
        transaction: &Transaction,
    ) -> ValidatorManagerResult<Address> {
        HashKind::Address
            .create_at(&transaction.signature, 0)
            .map_err(|source| ValidatorManagerError::MalformedSignature {
                transaction: transaction.hash,
                source,
            })
    }
}

/// Signature check over a whole bundle. The math lives behind this trait.
pub trait SignatureScheme: Send + Sync {
    fn verify_bundle(
        &self,
        bundle: &[Transaction],
        mode: SignatureMode,
        signer: &Address,
        security: u64,
    ) -> bool;
}

/// Requests the missing parts of a candidate that is not solid yet.
pub trait CandidateSolidifier: Send + Sync {
    fn add(&self, hash: Hash, round: RoundIndex);
}

/// Current round from wall-clock time.
pub trait RoundClock: Send + Sync {
    fn current_round(&self) -> RoundIndex;
}
