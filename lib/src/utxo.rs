//! Unspent output sets owned by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Tx, TxOut};
use crate::error::{CoinError, Result};
use crate::sha256::Hash;
use crate::{load_cbor, save_cbor, Saveable};

/// Reference to one output of a transaction. Orders by id bytes, then index.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    pub tx_id: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_id: Hash, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl std::fmt::Display for OutPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

/// Read access to spendable outputs, as needed by the signer
pub trait UtxoLookup {
    fn tx_out(&self, outpoint: &OutPoint) -> Option<&TxOut>;
}

/// Plain map from outpoint to output
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TxOutMap(HashMap<OutPoint, TxOut>);

impl TxOutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outpoint: OutPoint, tx_out: TxOut) {
        self.0.insert(outpoint, tx_out);
    }

    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TxOut> {
        self.0.remove(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOut> {
        self.0.get(outpoint)
    }

    /// Adds every output of `tx`
    pub fn add_tx_outputs(&mut self, tx: &Tx) {
        let tx_id = tx.id();
        for (index, tx_out) in tx.outputs().iter().enumerate() {
            self.add(OutPoint::new(tx_id, index as u32), tx_out.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TxOut)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl UtxoLookup for TxOutMap {
    fn tx_out(&self, outpoint: &OutPoint) -> Option<&TxOut> {
        self.get(outpoint)
    }
}

/// Output together with the number of the block that confirmed it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxOutBn {
    pub tx_out: TxOut,
    pub block_num: u32,
}

/// Outputs annotated with their confirming block, used for coin selection
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TxOutBnMap(HashMap<OutPoint, TxOutBn>);

impl TxOutBnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outpoint: OutPoint, tx_out: TxOut, block_num: u32) {
        self.0.insert(outpoint, TxOutBn { tx_out, block_num });
    }

    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TxOutBn> {
        self.0.remove(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOutBn> {
        self.0.get(outpoint)
    }

    /// Adds every output of `tx`, confirmed in `block_num`
    pub fn add_tx_outputs(&mut self, tx: &Tx, block_num: u32) {
        let tx_id = tx.id();
        for (index, tx_out) in tx.outputs().iter().enumerate() {
            self.add(OutPoint::new(tx_id, index as u32), tx_out.clone(), block_num);
        }
    }

    /// Drops the outputs spent by `tx`
    pub fn remove_tx_inputs(&mut self, tx: &Tx) {
        for input in tx.inputs() {
            self.remove(&input.outpoint());
        }
    }

    /// Entries oldest block first, ties broken by outpoint
    pub fn sorted(&self) -> Vec<(&OutPoint, &TxOutBn)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(outpoint, bn)| (bn.block_num, **outpoint));
        entries
    }

    /// Total value of all entries
    pub fn value(&self) -> Result<u64> {
        self.0.values().try_fold(0u64, |acc, bn| {
            acc.checked_add(bn.tx_out.value())
                .ok_or(CoinError::AmountOverflow)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TxOutBn)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl UtxoLookup for TxOutBnMap {
    fn tx_out(&self, outpoint: &OutPoint) -> Option<&TxOut> {
        self.get(outpoint).map(|bn| &bn.tx_out)
    }
}

/// Save and load expecting CBOR from ciborium as format
impl Saveable for TxOutBnMap {
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        load_cbor(reader, "TxOutBnMap")
    }

    fn save<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        save_cbor(self, writer, "TxOutBnMap")
    }
}
