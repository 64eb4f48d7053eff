//! Deterministic coin selection.
//!
//! Candidates are taken oldest block first, ties broken by outpoint, so two builders given
//! the same set and request produce byte-identical unsigned transactions. There are no fees:
//! any surplus goes to the change script, and a request the set cannot cover still yields a
//! transaction. Check [`BuiltTx::is_underfunded`] before signing.

use tracing::debug;

use crate::blockchain::{Tx, TxIn, TxOut};
use crate::error::{CoinError, Result};
use crate::script::Script;
use crate::utxo::TxOutBnMap;

/// Version of transactions produced by the builder
pub const TX_VERSION: u8 = 0;

pub struct TxBuilder<'a> {
    utxos: &'a TxOutBnMap,
    change_script: Script,
    lock_abs: u32,
    outputs: Vec<TxOut>,
}

/// Unsigned transaction together with the amounts it was built from
#[derive(Clone, Debug)]
pub struct BuiltTx {
    pub tx: Tx,
    /// Total value of the consumed outputs
    pub input_amount: u64,
    /// Total value of the requested outputs, change excluded
    pub spend_amount: u64,
}

impl BuiltTx {
    pub fn is_underfunded(&self) -> bool {
        self.input_amount < self.spend_amount
    }

    /// Missing value when under-funded
    pub fn shortfall(&self) -> u64 {
        self.spend_amount.saturating_sub(self.input_amount)
    }
}

impl<'a> TxBuilder<'a> {
    pub fn new(utxos: &'a TxOutBnMap, change_script: Script, lock_abs: u32) -> Self {
        Self {
            utxos,
            change_script,
            lock_abs,
            outputs: Vec::new(),
        }
    }

    pub fn add_output(&mut self, tx_out: TxOut) -> &mut Self {
        self.outputs.push(tx_out);
        self
    }

    pub fn build(&self) -> Result<BuiltTx> {
        let spend_amount = self.outputs.iter().try_fold(0u64, |acc, o| {
            acc.checked_add(o.value()).ok_or(CoinError::AmountOverflow)
        })?;

        let mut inputs = Vec::new();
        let mut input_amount = 0u64;
        for (outpoint, bn) in self.utxos.sorted() {
            if input_amount >= spend_amount {
                break;
            }
            let script = placeholder_for(bn.tx_out.script())?;
            input_amount = input_amount
                .checked_add(bn.tx_out.value())
                .ok_or(CoinError::AmountOverflow)?;
            inputs.push(TxIn::new(outpoint.tx_id, outpoint.index, script, 0));
        }

        let mut outputs = self.outputs.clone();
        if input_amount > spend_amount {
            outputs.push(TxOut::new(
                input_amount - spend_amount,
                self.change_script.clone(),
            ));
        }

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            input_amount,
            spend_amount,
            "built transaction"
        );

        Ok(BuiltTx {
            tx: Tx::new(TX_VERSION, inputs, outputs, self.lock_abs),
            input_amount,
            spend_amount,
        })
    }
}

/// Unlocking script template for spending an output locked by `script`
fn placeholder_for(script: &Script) -> Result<Script> {
    if script.is_pkh_output() {
        Ok(Script::pkh_input_placeholder())
    } else if script.is_pkhx_output() || script.is_pkhxr_output() {
        Ok(Script::unexpired_input_placeholder())
    } else {
        Err(CoinError::UnsupportedScript(script.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::sha256::Hash;
    use crate::utxo::OutPoint;

    fn utxos(values: &[u64]) -> TxOutBnMap {
        let mut map = TxOutBnMap::new();
        for (i, value) in values.iter().enumerate() {
            let pkh = KeyPair::new_random().public.pkh();
            let tx_out = TxOut::new(*value, Script::pkh_output(&pkh));
            map.add(OutPoint::new(Hash::zero(), i as u32), tx_out, 0);
        }
        map
    }

    #[test]
    fn covers_request_with_change() {
        let map = utxos(&[100; 5]);
        let mut builder = TxBuilder::new(&map, Script::default(), 0);
        builder.add_output(TxOut::new(50, Script::default()));

        let built = builder.build().unwrap();
        assert_eq!(built.tx.inputs().len(), 1);
        assert_eq!(built.tx.outputs().len(), 2);
        assert_eq!(built.tx.outputs()[0].value(), 50);
        assert_eq!(built.tx.outputs()[1].value(), 50);
        assert!(!built.is_underfunded());
    }

    #[test]
    fn returns_underfunded_tx() {
        let map = utxos(&[100; 5]);
        let mut builder = TxBuilder::new(&map, Script::default(), 0);
        builder.add_output(TxOut::new(10_000, Script::default()));

        let built = builder.build().unwrap();
        assert_eq!(built.tx.inputs().len(), 5);
        assert_eq!(built.tx.outputs().len(), 1);
        assert_eq!(built.tx.outputs()[0].value(), 10_000);
        assert_eq!(built.input_amount, 500);
        assert!(built.is_underfunded());
        assert_eq!(built.shortfall(), 9_500);
    }

    #[test]
    fn exact_amount_has_no_change() {
        let map = utxos(&[100; 5]);
        let mut builder = TxBuilder::new(&map, Script::default(), 9);
        builder.add_output(TxOut::new(200, Script::default()));

        let built = builder.build().unwrap();
        assert_eq!(built.tx.inputs().len(), 2);
        assert_eq!(built.tx.outputs().len(), 1);
        assert_eq!(built.tx.lock_abs(), 9);
    }

    #[test]
    fn prefers_older_outputs_then_outpoint_order() {
        let mut map = TxOutBnMap::new();
        let pkh = KeyPair::new_random().public.pkh();
        let script = Script::pkh_output(&pkh);
        map.add(OutPoint::new(Hash::new([2; 32]), 0), TxOut::new(10, script.clone()), 5);
        map.add(OutPoint::new(Hash::new([1; 32]), 1), TxOut::new(10, script.clone()), 5);
        map.add(OutPoint::new(Hash::new([9; 32]), 0), TxOut::new(10, script.clone()), 1);

        let mut builder = TxBuilder::new(&map, Script::default(), 0);
        builder.add_output(TxOut::new(25, Script::default()));
        let tx = builder.build().unwrap().tx;

        let spent: Vec<OutPoint> = tx.inputs().iter().map(TxIn::outpoint).collect();
        assert_eq!(
            spent,
            vec![
                OutPoint::new(Hash::new([9; 32]), 0),
                OutPoint::new(Hash::new([1; 32]), 1),
                OutPoint::new(Hash::new([2; 32]), 0),
            ]
        );

        // same request, same bytes
        assert_eq!(builder.build().unwrap().tx.to_bytes(), tx.to_bytes());
    }

    #[test]
    fn picks_placeholder_by_locking_shape() {
        let mut map = TxOutBnMap::new();
        let (a, b) = (
            KeyPair::new_random().public.pkh(),
            KeyPair::new_random().public.pkh(),
        );
        map.add(OutPoint::new(Hash::zero(), 0), TxOut::new(1, Script::pkh_output(&a)), 0);
        map.add(OutPoint::new(Hash::zero(), 1), TxOut::new(1, Script::pkhx_90d_output(&a)), 0);
        map.add(
            OutPoint::new(Hash::zero(), 2),
            TxOut::new(1, Script::pkhxr_1h_40m_output(&a, &b)),
            0,
        );

        let mut builder = TxBuilder::new(&map, Script::default(), 0);
        builder.add_output(TxOut::new(3, Script::default()));
        let tx = builder.build().unwrap().tx;
        assert!(tx.inputs()[0].script().is_pkh_input());
        assert!(tx.inputs()[1].script().is_unexpired_input());
        assert!(tx.inputs()[2].script().is_unexpired_input());
    }

    #[test]
    fn unsupported_shape_fails_build() {
        let mut map = TxOutBnMap::new();
        let script: Script = "DUP DROP".parse().unwrap();
        map.add(OutPoint::new(Hash::zero(), 0), TxOut::new(100, script), 0);

        let mut builder = TxBuilder::new(&map, Script::default(), 0);
        builder.add_output(TxOut::new(50, Script::default()));
        assert!(matches!(builder.build(), Err(CoinError::UnsupportedScript(_))));
    }
}
