use tracing::{debug, warn};

use crate::blockchain::{Tx, TxIn};
use crate::crypto::{PublicKey, TxSignature, SIGHASH_ALL};
use crate::error::{CoinError, Result, SignError};
use crate::keystore::PkhKeyMap;
use crate::utxo::UtxoLookup;

/// Fills the placeholders of PKH inputs with signatures and public keys.
///
/// The transaction passed in is never modified; signing produces a new one.
pub struct TxSigner<'a, U: UtxoLookup> {
    tx: &'a Tx,
    utxos: &'a U,
    keys: &'a PkhKeyMap,
}

impl<'a, U: UtxoLookup> TxSigner<'a, U> {
    pub fn new(tx: &'a Tx, utxos: &'a U, keys: &'a PkhKeyMap) -> Self {
        Self { tx, utxos, keys }
    }

    /// Signed copy of input `index`
    pub fn sign_input(&self, index: usize) -> Result<TxIn> {
        let fail = |reason| CoinError::Signing { index, reason };

        let input = self
            .tx
            .inputs()
            .get(index)
            .ok_or(fail(SignError::InputOutOfRange))?;
        let tx_out = self
            .utxos
            .tx_out(&input.outpoint())
            .ok_or(fail(SignError::MissingOutput))?;
        if !tx_out.script().is_pkh_output() {
            return Err(fail(SignError::NotPkhOutput));
        }
        if !input.script().is_pkh_input() {
            return Err(fail(SignError::NotPkhInput));
        }
        let keys = tx_out
            .script()
            .pkh()
            .and_then(|pkh| self.keys.get(&pkh))
            .ok_or(fail(SignError::MissingKey))?;

        let pubkey_len = keys.public.to_bytes().len();
        if pubkey_len != PublicKey::SIZE {
            return Err(fail(SignError::BadPublicKeyLength(pubkey_len)));
        }
        let sig = self.tx.sign(
            index,
            &keys.private,
            tx_out.script(),
            tx_out.value(),
            SIGHASH_ALL,
        )?;
        let sig_len = sig.to_bytes().len();
        if sig_len != TxSignature::SIZE {
            return Err(fail(SignError::BadSignatureLength(sig_len)));
        }

        debug!(index, outpoint = %input.outpoint(), "signed input");
        Ok(input
            .clone()
            .with_script(input.script().with_signature(&sig, &keys.public)))
    }

    /// Signs every input in order. Fails on the first input that cannot be signed.
    pub fn sign_all(&self) -> Result<Tx> {
        let inputs = (0..self.tx.inputs().len())
            .map(|index| self.sign_input(index))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| warn!("signing failed: {e}"))?;
        Ok(self.tx.clone().with_inputs(inputs))
    }
}
