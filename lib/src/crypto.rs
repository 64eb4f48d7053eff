use ecdsa::{
    signature::{Signer, Verifier},
    Signature as ECDSASignature, SigningKey, VerifyingKey,
};

use k256::Secp256k1;
use serde::{Deserialize, Serialize};

use crate::error::{CoinError, Result};
use crate::sha256::Hash;
use crate::{load_cbor, save_cbor, Saveable};

/// Hash type committing to every input and output
pub const SIGHASH_ALL: u8 = 0x01;

/// Signature over a transaction's signature hash, followed by its hash type byte
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxSignature {
    sig: ECDSASignature<Secp256k1>,
    hash_type: u8,
}

impl TxSignature {
    /// 64 bytes of r || s plus the hash type
    pub const SIZE: usize = 65;

    /// Sign a 32-byte signature hash
    pub fn sign(sighash: &Hash, privkey: &PrivateKey, hash_type: u8) -> Self {
        let sig = privkey.0.sign(sighash.as_bytes());
        Self { sig, hash_type }
    }

    /// Verify the signature against a signature hash
    pub fn verify(&self, sighash: &Hash, pubkey: &PublicKey) -> bool {
        pubkey.0.verify(sighash.as_bytes(), &self.sig).is_ok()
    }

    pub fn hash_type(&self) -> u8 {
        self.hash_type
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.sig.to_bytes().to_vec();
        bytes.push(self.hash_type);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (hash_type, sig) = match bytes.split_last() {
            Some((hash_type, sig)) if bytes.len() == Self::SIZE => (*hash_type, sig),
            _ => return Err(CoinError::InvalidSignature),
        };
        let sig = ECDSASignature::from_slice(sig).map_err(|_| CoinError::InvalidSignature)?;
        Ok(Self { sig, hash_type })
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey<Secp256k1>);

impl PublicKey {
    /// Compressed SEC1 size
    pub const SIZE: usize = 33;

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(CoinError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CoinError::InvalidPublicKey)
    }

    /// Hash of the compressed key that PKH scripts commit to
    pub fn pkh(&self) -> Pkh {
        Pkh::from_public_key(self)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&self.0.to_encoded_point(true).to_string())
            .finish()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PrivateKey(#[serde(with = "signkey_serde")] SigningKey<Secp256k1>);

impl PrivateKey {
    /// Generates new private key
    pub fn new_key() -> Self {
        Self(SigningKey::random(&mut rand::thread_rng()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SigningKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CoinError::InvalidPrivateKey)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    /// Corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.0.verifying_key())
    }
}

impl Saveable for PrivateKey {
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        load_cbor(reader, "PrivateKey")
    }

    fn save<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        save_cbor(self, writer, "PrivateKey")
    }
}

mod signkey_serde {
    use super::{Secp256k1, SigningKey};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(key: &SigningKey<Secp256k1>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&key.to_bytes())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SigningKey<Secp256k1>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        SigningKey::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Private key together with its public key
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn new_random() -> Self {
        Self::from_private(PrivateKey::new_key())
    }

    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }
}

/// Pubkey hash: double SHA256 of the compressed public key
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pkh(Hash);

impl Pkh {
    pub const SIZE: usize = 32;

    pub fn from_public_key(pubkey: &PublicKey) -> Self {
        Self(Hash::double_digest(&pubkey.to_bytes()))
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Hash::from_slice(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl std::str::FromStr for Pkh {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse().map(Self)
    }
}

impl std::fmt::Display for Pkh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
