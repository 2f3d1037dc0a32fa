//! # Hash Primitive
//!
//! SHA-256 based leaf and node hashing used by every tree in the workspace.
//!
//! ## Construction
//!
//! ```text
//! H_leaf(r)       = SHA256( SHA256(BE32(amount)) || SHA256(target) || SHA256(BE32(id)) )
//! H_node(l, r)    = SHA256( l || r )
//! ```
//!
//! `BE32` is the 32-byte big-endian encoding of an unsigned integer, the
//! same layout as a 256-bit ABI word. Internal hashing concatenates the
//! two child digests left operand first; order is fixed by tree position.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CommitmentError;
use crate::receipt::LeafPreimage;

/// A 32-byte tree node: either a leaf hash or an internal hash.
///
/// Serialized as 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeHash(pub [u8; 32]);

impl NodeHash {
    /// The all-zero digest.
    pub const ZERO: NodeHash = NodeHash([0u8; 32]);

    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-char hex string. Case-insensitive; surrounding whitespace
    /// is ignored.
    pub fn from_hex(hex: &str) -> Result<Self, CommitmentError> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return Err(CommitmentError::Digest(format!(
                "expected 64 hex chars, got {}",
                hex.len()
            )));
        }
        if let Some(pos) = hex.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(CommitmentError::Digest(format!(
                "invalid hex character at {pos}"
            )));
        }
        let mut out = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let s = std::str::from_utf8(chunk)
                .map_err(|e| CommitmentError::Digest(format!("invalid hex: {e}")))?;
            out[i] = u8::from_str_radix(s, 16)
                .map_err(|e| CommitmentError::Digest(format!("invalid hex at {i}: {e}")))?;
        }
        Ok(Self(out))
    }
}

impl std::fmt::Display for NodeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for NodeHash {
    type Err = CommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for NodeHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for NodeHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NodeHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute SHA-256 of raw bytes.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// Encode an unsigned integer as a 32-byte big-endian word.
pub fn be32(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Compute the leaf hash of a receipt preimage.
pub fn leaf_hash(preimage: &LeafPreimage<'_>) -> NodeHash {
    let mut hasher = Sha256::new();
    hasher.update(sha256(&be32(preimage.amount)));
    hasher.update(sha256(preimage.target));
    hasher.update(sha256(&be32(u128::from(preimage.id))));
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    NodeHash(out)
}

/// Compute an internal node hash: `SHA256(left || right)`.
pub fn node_hash(left: &NodeHash, right: &NodeHash) -> NodeHash {
    let mut input = [0u8; 64];
    input[..32].copy_from_slice(&left.0);
    input[32..].copy_from_slice(&right.0);
    NodeHash(sha256(&input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn be32_left_pads() {
        let word = be32(0x0186a0);
        assert!(word[..29].iter().all(|b| *b == 0));
        assert_eq!(&word[29..], &[0x01, 0x86, 0xa0]);
        assert_eq!(be32(0), [0u8; 32]);
    }

    #[test]
    fn be32_max_value_fills_low_half() {
        let word = be32(u128::MAX);
        assert!(word[..16].iter().all(|b| *b == 0));
        assert!(word[16..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn sha256_empty_known_vector() {
        assert_eq!(
            NodeHash(sha256(b"")).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn node_hash_is_order_sensitive() {
        let a = NodeHash(sha256(b"a"));
        let b = NodeHash(sha256(b"b"));
        assert_ne!(node_hash(&a, &b), node_hash(&b, &a));
    }

    #[test]
    fn node_hash_matches_manual_concatenation() {
        let a = NodeHash(sha256(b"left"));
        let b = NodeHash(sha256(b"right"));
        let mut joined = Vec::new();
        joined.extend_from_slice(a.as_bytes());
        joined.extend_from_slice(b.as_bytes());
        assert_eq!(node_hash(&a, &b), NodeHash(sha256(&joined)));
    }

    #[test]
    fn hex_roundtrip_and_case_insensitive() {
        let h = NodeHash(sha256(b"x"));
        assert_eq!(NodeHash::from_hex(&h.to_hex()).unwrap(), h);
        assert_eq!(NodeHash::from_hex(&h.to_hex().to_uppercase()).unwrap(), h);
        assert_eq!(format!("{h}"), h.to_hex());
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(NodeHash::from_hex("aabb").is_err());
        assert!(NodeHash::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn signed_hex_chunks_rejected() {
        assert!(NodeHash::from_hex(&"+f".repeat(32)).is_err());
        assert!(NodeHash::from_hex(&format!("-1{}", "0".repeat(62))).is_err());
        assert!(NodeHash::from_hex(&format!("{} 0", "0".repeat(61))).is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let h = NodeHash(sha256(b"serde"));
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: NodeHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    proptest::proptest! {
        #[test]
        fn hex_roundtrip_any_digest(bytes in proptest::array::uniform32(proptest::num::u8::ANY)) {
            let h = NodeHash(bytes);
            proptest::prop_assert_eq!(NodeHash::from_hex(&h.to_hex()).unwrap(), h);
        }

        #[test]
        fn be32_preserves_value(v in proptest::num::u128::ANY) {
            let word = be32(v);
            let mut low = [0u8; 16];
            low.copy_from_slice(&word[16..]);
            proptest::prop_assert_eq!(u128::from_be_bytes(low), v);
        }
    }
}
