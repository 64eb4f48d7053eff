use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crypto::{KeyPair, Pkh, PrivateKey};
use crate::{load_cbor, save_cbor, Saveable};

/// Key pairs indexed by the hash of their public key
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PkhKeyMap(HashMap<Pkh, KeyPair>);

impl PkhKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `keys` and returns its pubkey hash
    pub fn add(&mut self, keys: KeyPair) -> Pkh {
        let pkh = keys.public.pkh();
        self.0.insert(pkh, keys);
        pkh
    }

    pub fn add_private(&mut self, private: PrivateKey) -> Pkh {
        self.add(KeyPair::from_private(private))
    }

    pub fn remove(&mut self, pkh: &Pkh) -> Option<KeyPair> {
        self.0.remove(pkh)
    }

    pub fn get(&self, pkh: &Pkh) -> Option<&KeyPair> {
        self.0.get(pkh)
    }

    pub fn pkhs(&self) -> impl Iterator<Item = &Pkh> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Save and load expecting CBOR from ciborium as format
impl Saveable for PkhKeyMap {
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        load_cbor(reader, "PkhKeyMap")
    }

    fn save<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        save_cbor(self, writer, "PkhKeyMap")
    }
}
