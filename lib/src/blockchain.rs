//! Consensus records: headers, transactions, retargeting and mining.

mod difficulty;
mod header;
mod mining;
mod transaction;

pub use difficulty::{
    difficulty_from_target, genesis_target, max_target, mint_reward, new_difficulty,
    new_target, target_from_difficulty,
};
pub use header::{now_ms, Header, WorkParAlgo, WorkSerAlgo};
pub use mining::HeaderMiner;
pub use transaction::{Tx, TxIn, TxOut, MINT_INPUT_INDEX};
