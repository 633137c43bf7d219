//! In-memory candidate solidifier
//!
//! Records which candidates still need their past requested from peers.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use shared_types::{Hash, RoundIndex};
use tracing::debug;

use crate::ports::outbound::CandidateSolidifier;

#[derive(Debug, Default)]
pub struct InMemorySolidifier {
    requested: Mutex<BTreeMap<Hash, RoundIndex>>,
}

impl InMemorySolidifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests with the round they were made in.
    pub fn requested(&self) -> BTreeMap<Hash, RoundIndex> {
        self.requested.lock().clone()
    }

    /// Drop a request once the candidate became solid.
    pub fn complete(&self, hash: &Hash) -> bool {
        self.requested.lock().remove(hash).is_some()
    }
}

impl CandidateSolidifier for InMemorySolidifier {
    fn add(&self, hash: Hash, round: RoundIndex) {
        debug!(candidate = %hash, round, "Candidate queued for solidification");
        self.requested.lock().entry(hash).or_insert(round);
    }
}
