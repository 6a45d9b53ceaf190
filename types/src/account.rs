//! Account identity used for buyers, players, and capability holders.
//!
//! The engine does not do key management; an [`AccountId`] is an opaque
//! 32-byte identity supplied by the host (typically a public key hash).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque 32-byte account identity.
///
/// Serializes as a 64-character lowercase hex string so host-facing JSON
/// stays compact and human-auditable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Access the raw bytes of this identity.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Construct an identity from a single seed byte (test fixtures).
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; 32])
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.as_bytes();
        if raw.len() != 64 {
            return Err(serde::de::Error::custom("account id must be 64 hex chars"));
        }
        let mut bytes = [0u8; 32];
        for (i, pair) in raw.chunks_exact(2).enumerate() {
            let hi = hex_nibble(pair[0]);
            let lo = hex_nibble(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => return Err(serde::de::Error::custom("invalid hex in account id")),
            }
        }
        Ok(Self(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Truncated hex keeps log lines readable.
        write!(f, "AccountId(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}
