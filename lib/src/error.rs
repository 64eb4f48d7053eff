use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoinError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoinError {
    #[error("Not enough data: {0}")]
    NotEnoughData(&'static str),
    #[error("Too much data: {0} trailing bytes")]
    TooMuchData(usize),
    #[error("Non-minimal encoding: {0}")]
    NonMinimalEncoding(&'static str),
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid script: {0}")]
    InvalidScript(String),
    #[error("Unsupported script: {0}")]
    UnsupportedScript(String),
    #[error("Amount overflow")]
    AmountOverflow,
    #[error("Invalid difficulty: {0}")]
    Difficulty(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] ChainError),
    #[error("Invalid mint transaction: {0}")]
    InvalidMintTx(#[from] MintTxError),
    #[error("Cannot sign input {index}: {reason}")]
    Signing { index: usize, reason: SignError },
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Unknown algorithm id: {0}")]
    UnknownAlgo(u16),
}

/// Rules a header has to satisfy to extend a chain, in the order they are checked
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    #[error("nTransactions is 0")]
    NoTransactions,
    #[error("nTransactions {claimed} does not match actual number of transactions {actual}")]
    TransactionCountMismatch { claimed: u64, actual: u64 },
    #[error("id is not valid")]
    IdAboveTarget,
    #[error("version {0} is not valid")]
    InvalidVersion(u8),
    #[error("genesis is not valid")]
    InvalidGenesis,
    #[error("prevHeader is missing")]
    MissingPrevHeader,
    #[error("blockNum {got} is not valid, expected {expected}")]
    BlockNumMismatch { expected: u64, got: u32 },
    #[error("prevBlockId is not valid")]
    PrevBlockIdMismatch,
    #[error("timestamp is not after the previous header's timestamp")]
    TimestampNotIncreasing,
    #[error("target is not valid")]
    TargetMismatch,
    #[error("workSerAlgo {0} is not valid")]
    InvalidWorkSerAlgo(u16),
    #[error("workParAlgo {0} is not valid")]
    InvalidWorkParAlgo(u16),
    #[error("timestamp is in the future")]
    TimestampInFuture,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintTxError {
    #[error("not a mint tx")]
    NotMintTx,
    #[error("lockAbs {lock_abs} does not match block number {block_num}")]
    LockAbsMismatch { lock_abs: u32, block_num: u32 },
    #[error("version {0} is not 0")]
    InvalidVersion(u8),
    #[error("output {0} is not standard")]
    NonStandardOutput(usize),
    #[error("output amount {actual} does not match expected mint amount {expected}")]
    RewardMismatch { expected: u64, actual: u128 },
    #[error("script is not push only")]
    NotPushOnly,
    #[error("not enough script chunks")]
    NotEnoughChunks,
    #[error("no domain buf")]
    MissingDomain,
    #[error("domain {0:?} is not valid")]
    InvalidDomain(String),
    #[error("no block message id buf")]
    MissingBlockMessageId,
    #[error("block message id buf length {0} is not 32")]
    InvalidBlockMessageId(usize),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignError {
    #[error("input index out of range")]
    InputOutOfRange,
    #[error("referenced output not found")]
    MissingOutput,
    #[error("referenced output is not pkh")]
    NotPkhOutput,
    #[error("input script is not a pkh input")]
    NotPkhInput,
    #[error("no key for pubkey hash")]
    MissingKey,
    #[error("public key has wrong length {0}")]
    BadPublicKeyLength(usize),
    #[error("signature has wrong length {0}")]
    BadSignatureLength(usize),
}
