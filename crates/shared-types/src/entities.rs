//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Tangle**: `Transaction`, `TransactionType`, bundle essence hashing
//! - **Consensus**: `Round`, round Merkle root

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha3::{Digest, Sha3_256};

use crate::hash::{Address, Hash, NULL_HASH};

/// Index of a consensus round. `0` on a transaction means "unconfirmed".
pub type RoundIndex = u32;

/// Hash recorded for a round that carries no milestones.
pub const EMPTY_ROUND_HASH: Hash = NULL_HASH;

/// Size of the essence region hashed into a bundle hash.
pub const ESSENCE_SIZE: usize = Hash::SIZE_IN_BYTES * 2 + 8 * 4;

// =============================================================================
// CLUSTER A: THE TANGLE
// =============================================================================

/// Storage status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransactionType {
    /// Fully received and stored.
    #[default]
    Filled,
    /// Referenced by another transaction but never fetched.
    Prefilled,
}

/// A vertex of the Tangle.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: Hash,
    pub address: Address,
    pub bundle: Hash,
    pub trunk: Hash,
    pub branch: Hash,
    /// Negative spends, positive receives, zero carries data only.
    pub value: i64,
    /// Position inside the bundle. The tail sits at 0.
    pub current_index: u64,
    pub last_index: u64,
    pub timestamp: u64,
    pub tag: Hash,
    /// Round that confirmed this transaction, `0` while unconfirmed.
    pub round_index: RoundIndex,
    pub solid: bool,
    pub tx_type: TransactionType,
    /// Signature or message fragment.
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
}

impl Transaction {
    /// A filled, unconfirmed, non-solid single-transaction bundle.
    pub fn new(hash: Hash, address: Address, value: i64) -> Self {
        Self {
            hash,
            address,
            bundle: NULL_HASH,
            trunk: NULL_HASH,
            branch: NULL_HASH,
            value,
            current_index: 0,
            last_index: 0,
            timestamp: 0,
            tag: NULL_HASH,
            round_index: 0,
            solid: false,
            tx_type: TransactionType::Filled,
            signature: Vec::new(),
        }
    }

    /// Placeholder returned for a hash that is referenced but not stored.
    pub fn prefilled(hash: Hash) -> Self {
        Self {
            tx_type: TransactionType::Prefilled,
            ..Self::new(hash, NULL_HASH, 0)
        }
    }

    pub fn is_prefilled(&self) -> bool {
        self.tx_type == TransactionType::Prefilled
    }

    /// Bundle entry point.
    pub fn is_tail(&self) -> bool {
        self.current_index == 0
    }

    /// Last transaction of its bundle.
    pub fn is_head(&self) -> bool {
        self.current_index == self.last_index
    }

    /// Whether this transaction was confirmed at or before `boundary`.
    pub fn is_confirmed_by(&self, boundary: RoundIndex) -> bool {
        self.round_index != 0 && self.round_index <= boundary
    }

    /// Fixed-layout bytes covered by the bundle hash.
    ///
    /// `address | value | tag | timestamp | current_index | last_index`,
    /// integers big-endian.
    pub fn essence(&self) -> [u8; ESSENCE_SIZE] {
        let mut out = [0u8; ESSENCE_SIZE];
        out[0..32].copy_from_slice(self.address.as_bytes());
        out[32..40].copy_from_slice(&self.value.to_be_bytes());
        out[40..72].copy_from_slice(self.tag.as_bytes());
        out[72..80].copy_from_slice(&self.timestamp.to_be_bytes());
        out[80..88].copy_from_slice(&self.current_index.to_be_bytes());
        out[88..96].copy_from_slice(&self.last_index.to_be_bytes());
        out
    }
}

/// Sha3-256 over the essences of `transactions`, in the given order.
///
/// Callers pass the bundle ordered tail to head.
pub fn compute_bundle_hash<'a, I>(transactions: I) -> Hash
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut hasher = Sha3_256::new();
    for tx in transactions {
        hasher.update(tx.essence());
    }
    Hash(hasher.finalize().into())
}

// =============================================================================
// CLUSTER B: CONSENSUS
// =============================================================================

/// A consensus round: the milestone transactions issued for one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Round {
    pub index: RoundIndex,
    pub milestones: BTreeSet<Hash>,
}

impl Round {
    pub fn new(index: RoundIndex) -> Self {
        Self {
            index,
            milestones: BTreeSet::new(),
        }
    }

    pub fn with_milestones<I>(index: RoundIndex, milestones: I) -> Self
    where
        I: IntoIterator<Item = Hash>,
    {
        Self {
            index,
            milestones: milestones.into_iter().collect(),
        }
    }

    /// Merkle root over the milestone hashes in ascending order.
    ///
    /// Odd levels duplicate their last node. An empty round yields
    /// [`EMPTY_ROUND_HASH`].
    pub fn merkle_root(&self) -> Hash {
        let leaves: Vec<Hash> = self.milestones.iter().copied().collect();
        compute_merkle_root(&leaves)
    }
}

fn compute_merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return EMPTY_ROUND_HASH;
    }
    if leaves.len() == 1 {
        return leaves[0];
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);
        for chunk in level.chunks(2) {
            let left = &chunk[0];
            let right = chunk.get(1).unwrap_or(left);
            next_level.push(hash_pair(left, right));
        }
        level = next_level;
    }
    level[0]
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3_256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Hash(hasher.finalize().into())
}
