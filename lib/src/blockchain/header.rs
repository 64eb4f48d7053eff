use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};
use tracing::debug;

use crate::domain::is_valid_domain;
use crate::error::{ChainError, CoinError, MintTxError, Result};
use crate::merkle_root::MerkleRoot;
use crate::sha256::Hash;
use crate::wire::{self, Reader};
use crate::{load_wire, Saveable, HEADER_SIZE, U256};

use super::difficulty::{self, genesis_target};
use super::transaction::Tx;

/// Algorithm used to compute the serial work hash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, FromRepr)]
#[repr(u16)]
pub enum WorkSerAlgo {
    #[strum(serialize = "null")]
    Null = 0,
    #[strum(serialize = "hash256_3")]
    Hash256x3 = 3,
}

/// Algorithm used to compute the parallel work hash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, FromRepr)]
#[repr(u16)]
pub enum WorkParAlgo {
    #[strum(serialize = "pow5")]
    Pow5 = 5,
    #[strum(serialize = "algo1627")]
    Algo1627 = 1627,
}

/// Current wall clock time in milliseconds
pub fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Block header. All setters return a new header.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    version: u8,
    /// Id of the previous header
    prev_block_id: Hash,
    /// Merkle root of the block's transactions
    merkle_root: Hash,
    n_transactions: u64,
    /// Milliseconds since the Unix epoch
    timestamp: u64,
    block_num: u32,
    /// The id of this header has to be lower than the target
    target: U256,
    nonce: U256,
    work_ser_algo: u16,
    work_ser_hash: Hash,
    work_par_algo: u16,
    work_par_hash: Hash,
}

impl Header {
    /// First header of a chain, ready to be mined
    pub fn from_genesis(merkle_root: MerkleRoot, timestamp: u64) -> Self {
        Self::default()
            .with_merkle_root(merkle_root.hash())
            .with_n_transactions(1)
            .with_timestamp(timestamp)
            .with_target(genesis_target())
            .with_random_nonce()
            .with_work_ser(WorkSerAlgo::Hash256x3, Hash::zero())
            .with_work_par(WorkParAlgo::Algo1627, Hash::zero())
    }

    /// Header extending `prev`, retargeted for `timestamp`
    pub fn from_chain(
        prev: &Header,
        prev_prev: Option<&Header>,
        merkle_root: MerkleRoot,
        n_transactions: u64,
        timestamp: u64,
    ) -> Result<Self> {
        let target = difficulty::new_target(prev, prev_prev, timestamp)?;
        let block_num = prev.block_num.checked_add(1).ok_or(ChainError::BlockNumMismatch {
            expected: u64::from(prev.block_num) + 1,
            got: prev.block_num,
        })?;
        Ok(Self::default()
            .with_prev_block_id(prev.id())
            .with_merkle_root(merkle_root.hash())
            .with_n_transactions(n_transactions)
            .with_timestamp(timestamp)
            .with_block_num(block_num)
            .with_target(target)
            .with_work_ser(WorkSerAlgo::Null, Hash::zero())
            .with_work_par(WorkParAlgo::Pow5, Hash::zero()))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn prev_block_id(&self) -> &Hash {
        &self.prev_block_id
    }

    pub fn merkle_root(&self) -> &Hash {
        &self.merkle_root
    }

    pub fn n_transactions(&self) -> u64 {
        self.n_transactions
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn block_num(&self) -> u32 {
        self.block_num
    }

    pub fn target(&self) -> U256 {
        self.target
    }

    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    pub fn work_ser_algo(&self) -> u16 {
        self.work_ser_algo
    }

    pub fn work_ser_hash(&self) -> &Hash {
        &self.work_ser_hash
    }

    pub fn work_par_algo(&self) -> u16 {
        self.work_par_algo
    }

    pub fn work_par_hash(&self) -> &Hash {
        &self.work_par_hash
    }

    pub fn work_ser_algo_name(&self) -> Result<WorkSerAlgo> {
        WorkSerAlgo::from_repr(self.work_ser_algo)
            .ok_or(CoinError::UnknownAlgo(self.work_ser_algo))
    }

    pub fn work_par_algo_name(&self) -> Result<WorkParAlgo> {
        WorkParAlgo::from_repr(self.work_par_algo)
            .ok_or(CoinError::UnknownAlgo(self.work_par_algo))
    }

    #[must_use]
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_prev_block_id(mut self, prev_block_id: Hash) -> Self {
        self.prev_block_id = prev_block_id;
        self
    }

    #[must_use]
    pub fn with_merkle_root(mut self, merkle_root: Hash) -> Self {
        self.merkle_root = merkle_root;
        self
    }

    #[must_use]
    pub fn with_n_transactions(mut self, n_transactions: u64) -> Self {
        self.n_transactions = n_transactions;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_block_num(mut self, block_num: u32) -> Self {
        self.block_num = block_num;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: U256) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    #[must_use]
    pub fn with_random_nonce(self) -> Self {
        self.with_nonce(U256::from_big_endian(&rand::random::<[u8; 32]>()))
    }

    /// Overwrites the most significant 4 bytes of the nonce. Miners use this to split the
    /// nonce space into disjoint partitions.
    #[must_use]
    pub fn with_first_4_bytes_of_nonce(self, prefix: u32) -> Self {
        let mut nonce = self.nonce.to_big_endian();
        nonce[..4].copy_from_slice(&prefix.to_be_bytes());
        self.with_nonce(U256::from_big_endian(&nonce))
    }

    #[must_use]
    pub fn with_work_ser(mut self, algo: WorkSerAlgo, hash: Hash) -> Self {
        self.work_ser_algo = algo as u16;
        self.work_ser_hash = hash;
        self
    }

    #[must_use]
    pub fn with_work_par(mut self, algo: WorkParAlgo, hash: Hash) -> Self {
        self.work_par_algo = algo as u16;
        self.work_par_hash = hash;
        self
    }

    /// Same header with both work hashes zeroed, as hashed while the work is computed
    #[must_use]
    pub fn to_working_header(mut self) -> Self {
        self.work_ser_hash = Hash::zero();
        self.work_par_hash = Hash::zero();
        self
    }

    /// Sets the timestamp and the target the chain expects for it
    pub fn with_timestamp_and_target(
        self,
        prev: &Header,
        prev_prev: Option<&Header>,
        timestamp: u64,
    ) -> Result<Self> {
        let target = difficulty::new_target(prev, prev_prev, timestamp)?;
        Ok(self.with_timestamp(timestamp).with_target(target))
    }

    pub fn with_timestamp_and_target_now(
        self,
        prev: &Header,
        prev_prev: Option<&Header>,
    ) -> Result<Self> {
        self.with_timestamp_and_target(prev, prev_prev, now_ms())
    }

    /// Counts one more transaction under the new `merkle_root`
    #[must_use]
    pub fn add_tx(self, merkle_root: MerkleRoot, timestamp: Option<u64>) -> Self {
        let timestamp = timestamp.unwrap_or(self.timestamp);
        self.with_n_transactions(self.n_transactions.saturating_add(1))
            .with_merkle_root(merkle_root.hash())
            .with_timestamp(timestamp)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        out.push(self.version);
        out.extend_from_slice(self.prev_block_id.as_bytes());
        out.extend_from_slice(self.merkle_root.as_bytes());
        out.extend_from_slice(&self.n_transactions.to_be_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.block_num.to_be_bytes());
        wire::write_u256_be(&self.target, &mut out);
        wire::write_u256_be(&self.nonce, &mut out);
        out.extend_from_slice(&self.work_ser_algo.to_be_bytes());
        out.extend_from_slice(self.work_ser_hash.as_bytes());
        out.extend_from_slice(&self.work_par_algo.to_be_bytes());
        out.extend_from_slice(self.work_par_hash.as_bytes());

        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let header = Self {
            version: reader.read_u8()?,
            prev_block_id: reader.read_hash()?,
            merkle_root: reader.read_hash()?,
            n_transactions: reader.read_u64_be()?,
            timestamp: reader.read_u64_be()?,
            block_num: reader.read_u32_be()?,
            target: reader.read_u256_be()?,
            nonce: reader.read_u256_be()?,
            work_ser_algo: reader.read_u16_be()?,
            work_ser_hash: reader.read_hash()?,
            work_par_algo: reader.read_u16_be()?,
            work_par_hash: reader.read_hash()?,
        };
        reader.finish()?;
        Ok(header)
    }

    pub fn hash(&self) -> Hash {
        Hash::digest(&self.to_bytes())
    }

    pub fn id(&self) -> Hash {
        Hash::double_digest(&self.to_bytes())
    }

    pub fn id_num(&self) -> U256 {
        self.id().to_u256()
    }

    pub fn difficulty(&self) -> u64 {
        difficulty::difficulty_from_target(&self.target)
    }

    /// No transactions committed yet
    pub fn is_empty(&self) -> bool {
        self.merkle_root.is_zero()
    }

    pub fn is_id_valid(&self) -> bool {
        self.id_num() < self.target
    }

    pub fn is_version_valid(&self) -> bool {
        self.version == 0
    }

    pub fn is_timestamp_valid_at(&self, timestamp: u64) -> bool {
        self.timestamp <= timestamp
    }

    pub fn is_timestamp_valid_now(&self) -> bool {
        self.is_timestamp_valid_at(now_ms())
    }

    pub fn is_work_ser_algo_valid(&self) -> bool {
        WorkSerAlgo::from_repr(self.work_ser_algo).is_some()
    }

    pub fn is_work_par_algo_valid(&self) -> bool {
        WorkParAlgo::from_repr(self.work_par_algo).is_some()
    }

    pub fn is_target_valid(&self, prev: &Header, prev_prev: Option<&Header>) -> bool {
        difficulty::new_target(prev, prev_prev, self.timestamp)
            .is_ok_and(|target| target == self.target)
    }

    pub fn is_genesis(&self) -> bool {
        let genesis_target = genesis_target();
        self.id_num() < genesis_target
            && self.target == genesis_target
            && self.block_num == 0
            && self.prev_block_id.is_zero()
            && self.work_ser_algo == WorkSerAlgo::Hash256x3 as u16
            && self.work_par_algo == WorkParAlgo::Algo1627 as u16
    }

    /// Checks that this header extends the chain ending in `prev`. Rules are checked in a
    /// fixed order and the first one broken is reported.
    pub fn validate_in_chain(
        &self,
        prev: Option<&Header>,
        prev_prev: Option<&Header>,
        actual_n_transactions: u64,
    ) -> std::result::Result<(), ChainError> {
        self.check_in_chain(prev, prev_prev, actual_n_transactions)
            .inspect_err(|e| debug!(block_num = self.block_num, "header rejected: {e}"))
    }

    fn check_in_chain(
        &self,
        prev: Option<&Header>,
        prev_prev: Option<&Header>,
        actual_n_transactions: u64,
    ) -> std::result::Result<(), ChainError> {
        if self.n_transactions == 0 {
            return Err(ChainError::NoTransactions);
        }
        if self.n_transactions != actual_n_transactions {
            return Err(ChainError::TransactionCountMismatch {
                claimed: self.n_transactions,
                actual: actual_n_transactions,
            });
        }
        if !self.is_id_valid() {
            return Err(ChainError::IdAboveTarget);
        }
        if !self.is_version_valid() {
            return Err(ChainError::InvalidVersion(self.version));
        }
        if self.block_num == 0 {
            return if self.is_genesis() {
                Ok(())
            } else {
                Err(ChainError::InvalidGenesis)
            };
        }
        let prev = prev.ok_or(ChainError::MissingPrevHeader)?;
        let expected = u64::from(prev.block_num) + 1;
        if u64::from(self.block_num) != expected {
            return Err(ChainError::BlockNumMismatch {
                expected,
                got: self.block_num,
            });
        }
        if self.prev_block_id != prev.id() {
            return Err(ChainError::PrevBlockIdMismatch);
        }
        if self.timestamp <= prev.timestamp {
            return Err(ChainError::TimestampNotIncreasing);
        }
        if !self.is_target_valid(prev, prev_prev) {
            return Err(ChainError::TargetMismatch);
        }
        if !self.is_work_ser_algo_valid() {
            return Err(ChainError::InvalidWorkSerAlgo(self.work_ser_algo));
        }
        if !self.is_work_par_algo_valid() {
            return Err(ChainError::InvalidWorkParAlgo(self.work_par_algo));
        }
        Ok(())
    }

    /// Chain rules plus the header not being stamped after `now`
    pub fn validate_at(
        &self,
        prev: Option<&Header>,
        prev_prev: Option<&Header>,
        actual_n_transactions: u64,
        now: u64,
    ) -> std::result::Result<(), ChainError> {
        if !self.is_timestamp_valid_at(now) {
            debug!(block_num = self.block_num, now, "header rejected: timestamp in future");
            return Err(ChainError::TimestampInFuture);
        }
        self.validate_in_chain(prev, prev_prev, actual_n_transactions)
    }

    pub fn validate_now(
        &self,
        prev: Option<&Header>,
        prev_prev: Option<&Header>,
        actual_n_transactions: u64,
    ) -> std::result::Result<(), ChainError> {
        self.validate_at(prev, prev_prev, actual_n_transactions, now_ms())
    }

    /// Checks the block reward transaction of this header
    pub fn validate_mint_tx(&self, tx: &Tx) -> std::result::Result<(), MintTxError> {
        if !tx.is_mint_tx() {
            return Err(MintTxError::NotMintTx);
        }
        if tx.lock_abs() != self.block_num {
            return Err(MintTxError::LockAbsMismatch {
                lock_abs: tx.lock_abs(),
                block_num: self.block_num,
            });
        }
        if tx.version() != 0 {
            return Err(MintTxError::InvalidVersion(tx.version()));
        }
        if let Some(index) = tx
            .outputs()
            .iter()
            .position(|output| !output.script().is_standard_output())
        {
            return Err(MintTxError::NonStandardOutput(index));
        }
        let expected = difficulty::mint_reward(self.block_num);
        let actual = tx.total_output_value();
        if actual != u128::from(expected) {
            return Err(MintTxError::RewardMismatch { expected, actual });
        }

        let chunks = tx.inputs()[0].script().chunks();
        if !tx.inputs()[0].script().is_push_only() {
            return Err(MintTxError::NotPushOnly);
        }
        let [.., id_chunk, domain_chunk] = chunks else {
            return Err(MintTxError::NotEnoughChunks);
        };
        let domain = domain_chunk.data().ok_or(MintTxError::MissingDomain)?;
        let domain = String::from_utf8_lossy(domain);
        if !is_valid_domain(&domain) {
            return Err(MintTxError::InvalidDomain(domain.into_owned()));
        }
        let id = id_chunk.data().ok_or(MintTxError::MissingBlockMessageId)?;
        if id.len() != Hash::SIZE {
            return Err(MintTxError::InvalidBlockMessageId(id.len()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl std::str::FromStr for Header {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }
}

/// Save and load the wire encoding
impl Saveable for Header {
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        load_wire(reader, Self::from_bytes)
    }

    fn save<W: std::io::Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}
