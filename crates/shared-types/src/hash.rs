//! # Hash
//!
//! A single fixed-size identifier used for transactions, addresses, bundles
//! and tags. The semantic role is carried by [`HashKind`] only where a
//! factory needs it; equality and ordering are byte-wise for every role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HashError;

/// A 32-byte identifier with byte-wise ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

/// Addresses share the hash representation.
pub type Address = Hash;

/// Hash of the all-zero bytes. Stands for genesis and for "no reference".
pub const NULL_HASH: Hash = Hash([0u8; 32]);

impl Hash {
    /// Number of bytes in a hash.
    pub const SIZE_IN_BYTES: usize = 32;

    /// Build a hash from the first [`Hash::SIZE_IN_BYTES`] bytes of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() < Self::SIZE_IN_BYTES {
            return Err(HashError::InvalidLength {
                expected: Self::SIZE_IN_BYTES,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes[..Self::SIZE_IN_BYTES]);
        Ok(Self(out))
    }

    pub fn is_null(&self) -> bool {
        *self == NULL_HASH
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "Hash({}..)", &self.to_hex()[..16])
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| HashError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::SIZE_IN_BYTES {
            return Err(HashError::InvalidLength {
                expected: Self::SIZE_IN_BYTES,
                actual: bytes.len(),
            });
        }
        Self::from_slice(&bytes)
    }
}

/// Semantic role of a hash.
///
/// Used for factory dispatch when a hash is cut out of a larger byte region,
/// e.g. the signature fragment of a milestone or an application bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Transaction,
    Address,
    Bundle,
    Tag,
}

impl HashKind {
    /// Create a hash of this kind from the leading bytes of `source`.
    pub fn create(self, source: &[u8]) -> Result<Hash, HashError> {
        Hash::from_slice(source)
    }

    /// Create a hash of this kind from `source[offset..offset + 32]`.
    pub fn create_at(self, source: &[u8], offset: usize) -> Result<Hash, HashError> {
        let end = offset.saturating_add(Hash::SIZE_IN_BYTES);
        if end > source.len() {
            return Err(HashError::InvalidLength {
                expected: end,
                actual: source.len(),
            });
        }
        Hash::from_slice(&source[offset..end])
    }
}
