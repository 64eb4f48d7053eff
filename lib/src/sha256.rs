use serde::{Deserialize, Serialize};

use crate::error::CoinError;
use crate::U256;

/// 32-byte digest used for ids, pubkey hashes and work fields
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    pub const SIZE: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Single SHA256 of `data`
    pub fn digest(data: &[u8]) -> Self {
        let hash = sha256::digest(data.to_vec());
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&hash, &mut bytes).expect("SHA256 hash should be valid hex string");
        Self(bytes)
    }

    /// SHA256 applied twice
    pub fn double_digest(data: &[u8]) -> Self {
        Self::digest(&Self::digest(data).0)
    }

    /// Zero hash
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    /// Interprets the digest as a big-endian number
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for Hash {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self)
    }
}

impl std::fmt::LowerHex for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
