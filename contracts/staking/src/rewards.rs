//! Fixed-point reward accumulator math.
//!
//! Rewards are tracked with a single global counter, `acc_reward_per_share`,
//! holding the reward owed to one unit of stake since genesis, scaled by
//! [`SCALE`]. A participant's pending reward is the difference between what
//! their stake is worth against the current counter and the snapshot
//! (`reward_debt`) taken at their last settlement, so settling one staker
//! never touches any other.
//!
//! Products are formed in 256 bits and only the quotient has to fit `i128`,
//! so a large rate held over a long interval still accrues. Nothing here
//! touches storage; that lives in `lib.rs`.

use soroban_sdk::{Env, I256};

/// Fixed-point scale applied to `acc_reward_per_share`.
pub const SCALE: i128 = 1_000_000_000_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RewardError {
    /// A quotient did not fit `i128`.
    Overflow,
    /// Current entitlement fell below the recorded debt.
    NegativePending,
}

/// Global reward state at a given ledger sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pool {
    pub total_staked: i128,
    pub reward_per_block: i128,
    pub acc_reward_per_share: i128,
    pub last_accrual_block: u32,
}

impl Pool {
    /// Advance the accumulator to `now`.
    ///
    /// With nothing staked the accumulator is left alone but the accrual
    /// block still moves forward, so empty periods emit nothing.
    pub fn accrued(self, env: &Env, now: u32) -> Result<Pool, RewardError> {
        let elapsed = now.saturating_sub(self.last_accrual_block);
        let acc = accumulate(
            env,
            self.acc_reward_per_share,
            self.reward_per_block,
            elapsed,
            self.total_staked,
        )?;
        Ok(Pool {
            acc_reward_per_share: acc,
            last_accrual_block: now.max(self.last_accrual_block),
            ..self
        })
    }
}

/// `a * b / c` with a 256-bit product. Callers keep every operand
/// non-negative and `c` positive.
fn mul_div(env: &Env, a: i128, b: i128, c: i128) -> Result<i128, RewardError> {
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, c))
        .to_i128()
        .ok_or(RewardError::Overflow)
}

/// `acc + reward_per_block * elapsed * SCALE / total_staked`, or `acc`
/// unchanged when no blocks elapsed or nothing is staked.
pub fn accumulate(
    env: &Env,
    acc: i128,
    reward_per_block: i128,
    elapsed: u32,
    total_staked: i128,
) -> Result<i128, RewardError> {
    if elapsed == 0 || total_staked <= 0 || reward_per_block <= 0 {
        return Ok(acc);
    }
    // rate < 2^127, elapsed < 2^32, SCALE < 2^40: the product stays in I256.
    let emitted = I256::from_i128(env, reward_per_block)
        .mul(&I256::from_i128(env, i128::from(elapsed)))
        .mul(&I256::from_i128(env, SCALE))
        .div(&I256::from_i128(env, total_staked))
        .to_i128()
        .ok_or(RewardError::Overflow)?;
    acc.checked_add(emitted).ok_or(RewardError::Overflow)
}

/// Descaled value of `staked` against the accumulator. Stored as the
/// participant's debt after every settlement.
pub fn reward_debt(env: &Env, staked: i128, acc: i128) -> Result<i128, RewardError> {
    if staked == 0 || acc == 0 {
        return Ok(0);
    }
    mul_div(env, staked, acc, SCALE)
}

/// Reward accrued since the participant's last settlement.
pub fn pending(env: &Env, staked: i128, acc: i128, debt: i128) -> Result<i128, RewardError> {
    let owed = reward_debt(env, staked, acc)?
        .checked_sub(debt)
        .ok_or(RewardError::Overflow)?;
    if owed < 0 {
        return Err(RewardError::NegativePending);
    }
    Ok(owed)
}
