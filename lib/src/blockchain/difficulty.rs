//! Target retargeting. Every header is retargeted from the two headers before it.

use crate::error::{CoinError, Result};
use crate::{
    BASE_REWARD, BLOCK_INTERVAL_MS, GENESIS_DIFFICULTY, HALVING_INTERVAL, MIN_DIFFICULTY, U256,
};

use super::Header;

/// Largest possible target, all bits set
pub fn max_target() -> U256 {
    U256::MAX
}

/// `max_target / difficulty`. A zero difficulty maps to the maximum target.
pub fn target_from_difficulty(difficulty: u64) -> U256 {
    if difficulty == 0 {
        return max_target();
    }
    max_target() / U256::from(difficulty)
}

/// `max_target / target`, saturating at `u64::MAX`
pub fn difficulty_from_target(target: &U256) -> u64 {
    if target.is_zero() {
        return u64::MAX;
    }
    let difficulty = max_target() / *target;
    if difficulty.bits() > 64 {
        u64::MAX
    } else {
        difficulty.low_u64()
    }
}

pub fn genesis_target() -> U256 {
    target_from_difficulty(GENESIS_DIFFICULTY)
}

/// Difficulty the header after `prev` must carry when stamped with `new_timestamp`.
///
/// Without `prev_prev` the difficulty is carried over. Otherwise it is first scaled by how
/// far the previous interval missed the ideal one, then pulled toward the ideal interval
/// with `exp(-ln(10) * (ratio - 1))`, where `ratio` is the new interval over the ideal.
/// The result never drops below [`MIN_DIFFICULTY`].
pub fn new_difficulty(
    prev: &Header,
    prev_prev: Option<&Header>,
    new_timestamp: u64,
) -> Result<u64> {
    let prev_difficulty = prev.difficulty();
    let Some(prev_prev) = prev_prev else {
        return Ok(prev_difficulty);
    };

    let prev_interval = i128::from(prev.timestamp()) - i128::from(prev_prev.timestamp());
    if prev_interval <= 0 {
        return Err(CoinError::Difficulty(format!(
            "previous interval {prev_interval} ms is not positive"
        )));
    }
    let ideal = BLOCK_INTERVAL_MS as f64;

    let raw = prev_difficulty as f64 * ideal / prev_interval as f64;

    let max_factor = 10f64;
    let k = max_factor.ln();
    let ratio = (i128::from(new_timestamp) - i128::from(prev.timestamp())) as f64 / ideal;
    let adjustment = (-k * (ratio - 1.0)).exp();

    let difficulty = (raw * adjustment).max(MIN_DIFFICULTY as f64).floor();
    if !difficulty.is_finite() || difficulty >= u64::MAX as f64 {
        return Err(CoinError::Difficulty(format!(
            "difficulty {difficulty} does not fit in 64 bits"
        )));
    }
    Ok(difficulty as u64)
}

pub fn new_target(
    prev: &Header,
    prev_prev: Option<&Header>,
    new_timestamp: u64,
) -> Result<U256> {
    new_difficulty(prev, prev_prev, new_timestamp).map(target_from_difficulty)
}

/// Value a mint transaction of `block_num` has to pay out, halved every
/// [`HALVING_INTERVAL`] blocks
pub fn mint_reward(block_num: u32) -> u64 {
    BASE_REWARD
        .checked_shr(block_num / HALVING_INTERVAL)
        .unwrap_or(0)
}
