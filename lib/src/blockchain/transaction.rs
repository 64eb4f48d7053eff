use serde::{Deserialize, Serialize};

use crate::crypto::{PrivateKey, PublicKey, TxSignature};
use crate::error::{CoinError, Result, SignError};
use crate::script::{Script, ScriptChunk};
use crate::sha256::Hash;
use crate::utxo::OutPoint;
use crate::wire::{self, Reader};
use crate::{load_wire, Saveable};

/// Output index used by the single input of a mint transaction
pub const MINT_INPUT_INDEX: u32 = u32::MAX;

/// Transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tx {
    version: u8,
    inputs: Vec<TxIn>,
    outputs: Vec<TxOut>,
    lock_abs: u32,
}

impl Tx {
    pub fn new(version: u8, inputs: Vec<TxIn>, outputs: Vec<TxOut>, lock_abs: u32) -> Self {
        Self {
            version,
            inputs,
            outputs,
            lock_abs,
        }
    }

    /// Block reward transaction for `block_num`. The input script pushes the block message
    /// id and then the miner's domain, so the domain ends up on top of the stack.
    pub fn new_mint(
        block_num: u32,
        block_message_id: Hash,
        domain: &str,
        outputs: Vec<TxOut>,
    ) -> Result<Self> {
        let script = Script::new(vec![
            ScriptChunk::from_data(block_message_id.as_bytes().to_vec())?,
            ScriptChunk::from_data(domain.as_bytes().to_vec())?,
        ]);
        let input = TxIn::new(Hash::zero(), MINT_INPUT_INDEX, script, 0);
        Ok(Self::new(0, vec![input], outputs, block_num))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    pub fn lock_abs(&self) -> u32 {
        self.lock_abs
    }

    /// Same transaction with its inputs replaced
    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<TxIn>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Sum of output values, wide enough that it cannot overflow
    pub fn total_output_value(&self) -> u128 {
        self.outputs.iter().map(|o| u128::from(o.value)).sum()
    }

    /// Single input spending the zero id with a push-only script
    pub fn is_mint_tx(&self) -> bool {
        match self.inputs.as_slice() {
            [input] => input.input_tx_id.is_zero() && input.script.is_push_only(),
            _ => false,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.version];
        wire::write_var_int(self.inputs.len() as u64, &mut out);
        for input in &self.inputs {
            input.encode(&mut out);
        }
        wire::write_var_int(self.outputs.len() as u64, &mut out);
        for output in &self.outputs {
            output.encode(&mut out);
        }
        out.extend_from_slice(&self.lock_abs.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let tx = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(tx)
    }

    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let version = reader.read_u8()?;
        let n_inputs = reader.read_var_int()?;
        let mut inputs = Vec::new();
        for _ in 0..n_inputs {
            inputs.push(TxIn::decode(reader)?);
        }
        let n_outputs = reader.read_var_int()?;
        let mut outputs = Vec::new();
        for _ in 0..n_outputs {
            outputs.push(TxOut::decode(reader)?);
        }
        let lock_abs = reader.read_u32_be()?;
        Ok(Self::new(version, inputs, outputs, lock_abs))
    }

    pub fn hash(&self) -> Hash {
        Hash::digest(&self.to_bytes())
    }

    pub fn id(&self) -> Hash {
        Hash::double_digest(&self.to_bytes())
    }

    /// Digest signed by input `index`. It commits to every outpoint, sequence and output,
    /// and to the locking script and value being spent. Input scripts are left out.
    pub fn sighash(
        &self,
        index: usize,
        script: &Script,
        value: u64,
        hash_type: u8,
    ) -> Result<Hash> {
        let input = self.inputs.get(index).ok_or(CoinError::Signing {
            index,
            reason: SignError::InputOutOfRange,
        })?;

        let mut outpoints = Vec::with_capacity(self.inputs.len() * 36);
        let mut sequences = Vec::with_capacity(self.inputs.len() * 4);
        for i in &self.inputs {
            outpoints.extend_from_slice(i.input_tx_id.as_bytes());
            outpoints.extend_from_slice(&i.input_tx_out_num.to_be_bytes());
            sequences.extend_from_slice(&i.sequence.to_be_bytes());
        }
        let mut outputs = Vec::new();
        for o in &self.outputs {
            o.encode(&mut outputs);
        }

        let mut preimage = vec![self.version];
        preimage.extend_from_slice(Hash::double_digest(&outpoints).as_bytes());
        preimage.extend_from_slice(Hash::double_digest(&sequences).as_bytes());
        preimage.extend_from_slice(input.input_tx_id.as_bytes());
        preimage.extend_from_slice(&input.input_tx_out_num.to_be_bytes());
        wire::write_var_bytes(&script.to_bytes(), &mut preimage);
        preimage.extend_from_slice(&value.to_be_bytes());
        preimage.extend_from_slice(&input.sequence.to_be_bytes());
        preimage.extend_from_slice(Hash::double_digest(&outputs).as_bytes());
        preimage.extend_from_slice(&self.lock_abs.to_be_bytes());
        preimage.push(hash_type);

        Ok(Hash::double_digest(&preimage))
    }

    /// Signs input `index` which spends an output locked by `script` holding `value`
    pub fn sign(
        &self,
        index: usize,
        privkey: &PrivateKey,
        script: &Script,
        value: u64,
        hash_type: u8,
    ) -> Result<TxSignature> {
        let sighash = self.sighash(index, script, value, hash_type)?;
        Ok(TxSignature::sign(&sighash, privkey, hash_type))
    }

    pub fn verify(
        &self,
        index: usize,
        pubkey: &PublicKey,
        sig: &TxSignature,
        script: &Script,
        value: u64,
    ) -> bool {
        self.sighash(index, script, value, sig.hash_type())
            .is_ok_and(|sighash| sig.verify(&sighash, pubkey))
    }
}

impl std::fmt::Display for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl std::str::FromStr for Tx {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }
}

/// Save and load the wire encoding
impl Saveable for Tx {
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        load_wire(reader, Self::from_bytes)
    }

    fn save<W: std::io::Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

/// Transaction input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    /// Id of the transaction whose output is spent
    input_tx_id: Hash,
    /// Index of the spent output within that transaction
    input_tx_out_num: u32,
    /// Unlocking script
    script: Script,
    sequence: u32,
}

impl TxIn {
    pub fn new(input_tx_id: Hash, input_tx_out_num: u32, script: Script, sequence: u32) -> Self {
        Self {
            input_tx_id,
            input_tx_out_num,
            script,
            sequence,
        }
    }

    pub fn input_tx_id(&self) -> &Hash {
        &self.input_tx_id
    }

    pub fn input_tx_out_num(&self) -> u32 {
        self.input_tx_out_num
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.input_tx_id, self.input_tx_out_num)
    }

    #[must_use]
    pub fn with_script(mut self, script: Script) -> Self {
        self.script = script;
        self
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.input_tx_id.as_bytes());
        out.extend_from_slice(&self.input_tx_out_num.to_be_bytes());
        wire::write_var_bytes(&self.script.to_bytes(), out);
        out.extend_from_slice(&self.sequence.to_be_bytes());
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let input_tx_id = reader.read_hash()?;
        let input_tx_out_num = reader.read_u32_be()?;
        let script = Script::from_bytes(reader.read_var_bytes()?)?;
        let sequence = reader.read_u32_be()?;
        Ok(Self::new(input_tx_id, input_tx_out_num, script, sequence))
    }
}

// Transaction output
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    value: u64,
    /// Locking script
    script: Script,
}

impl TxOut {
    pub fn new(value: u64, script: Script) -> Self {
        Self { value, script }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_be_bytes());
        wire::write_var_bytes(&self.script.to_bytes(), out);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let value = reader.read_u64_be()?;
        let script = Script::from_bytes(reader.read_var_bytes()?)?;
        Ok(Self::new(value, script))
    }
}
