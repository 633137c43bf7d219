//! Candidate outcomes and the analysis queue

use std::collections::{HashSet, VecDeque};

use shared_types::Hash;

/// Verdict on one application bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateValidity {
    /// Bundle and signature check out.
    Valid,
    /// Bad signature. Never looked at again.
    Invalid,
    /// Bundle not fully present yet. Retried later.
    Incomplete,
    /// The announced address is already an active validator.
    AlreadyProcessed,
}

impl CandidateValidity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Incomplete => "incomplete",
            Self::AlreadyProcessed => "already_processed",
        }
    }
}

/// Candidates waiting for analysis.
///
/// Every hash passes through `seen` before it is queued, so the background
/// scan and external callers never queue a hash twice. A hash leaves `seen`
/// only through [`CandidateQueue::release`].
#[derive(Debug, Default)]
pub struct CandidateQueue {
    seen: HashSet<Hash>,
    pending: VecDeque<Hash>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `hash` at the front unless it was seen before.
    pub fn offer(&mut self, hash: Hash) -> bool {
        if !self.seen.insert(hash) {
            return false;
        }
        self.pending.push_front(hash);
        true
    }

    pub fn pop(&mut self) -> Option<Hash> {
        self.pending.pop_front()
    }

    /// Forget `hash` so the next scan picks it up again.
    pub fn release(&mut self, hash: &Hash) {
        self.seen.remove(hash);
    }

    pub fn is_seen(&self, hash: &Hash) -> bool {
        self.seen.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
