#![no_std]

pub mod events;
pub mod rewards;

use common::ledger::LedgerClient;
use common::multisig::{self, GateState, MultisigError};
use rewards::{Pool, RewardError};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const LEDGER: Symbol = symbol_short!("LEDGER");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const REWARD_PER_BLOCK: Symbol = symbol_short!("RWD_PBLK");
const ACC_REWARD_PER_SHARE: Symbol = symbol_short!("ACC_RPS");
const LAST_ACCRUAL_BLOCK: Symbol = symbol_short!("LAST_BLK");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const USER_STAKE: Symbol = symbol_short!("STK");
const USER_DEBT: Symbol = symbol_short!("RWD_DEBT");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAManager = 3,
    InvalidInput = 4,
    InsufficientAllowance = 5,
    InsufficientBalance = 6,
    InsufficientStake = 7,
    NotAllConfirmed = 8,
    AlreadyConfirmed = 9,
    InvalidManagers = 10,
    ArithmeticOverflow = 11,
    InvariantViolation = 12,
    RewardMintUnauthorized = 13,
}

impl From<MultisigError> for ContractError {
    fn from(err: MultisigError) -> Self {
        match err {
            MultisigError::InvalidConfig => ContractError::InvalidManagers,
            MultisigError::NotAManager => ContractError::NotAManager,
            MultisigError::AlreadyConfirmed => ContractError::AlreadyConfirmed,
            MultisigError::NotAllConfirmed => ContractError::NotAllConfirmed,
        }
    }
}

impl From<RewardError> for ContractError {
    fn from(err: RewardError) -> Self {
        match err {
            RewardError::Overflow => ContractError::ArithmeticOverflow,
            RewardError::NegativePending => ContractError::InvariantViolation,
        }
    }
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of a user's staking position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub reward_debt: i128,
    pub pending_rewards: i128,
}

/// A staker's stored record.
#[derive(Clone, Copy, Debug, Default)]
struct Position {
    amount: i128,
    reward_debt: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `ledger`           – token ledger holding staked principal and
    ///                        minting rewards. The engine must be added to its
    ///                        managers (`set_mgr`) before rewards can be paid.
    /// * `managers`         – fixed set whose unanimous confirmation is needed
    ///                        to change `reward_per_block`.
    /// * `reward_per_block` – tokens emitted per ledger sequence across all
    ///                        stakers.
    pub fn initialize(
        env: Env,
        ledger: Address,
        managers: Vec<Address>,
        reward_per_block: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            return Err(ContractError::InvalidInput);
        }

        multisig::configure(&env, managers.clone())?;

        let now = env.ledger().sequence();

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&LEDGER, &ledger);
        store_pool(
            &env,
            &Pool {
                total_staked: 0,
                reward_per_block,
                acc_reward_per_share: 0,
                last_accrual_block: now,
            },
        );

        events::publish_initialized(&env, ledger, managers, reward_per_block);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` tokens from `staker`, who must have approved the
    /// engine on the ledger beforehand.
    ///
    /// Reward accrued on the existing position is paid out first, so the new
    /// deposit never earns retroactively. Returns the reward paid.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let ledger = Self::ledger_client(&env)?;
        let engine = env.current_contract_address();

        if ledger.allowance(&staker, &engine) < amount {
            return Err(ContractError::InsufficientAllowance);
        }
        if ledger.balance_of(&staker) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        // 1. Advance the accumulator and settle against the pre-stake amount.
        let pool = load_pool(&env).accrued(&env, env.ledger().sequence())?;
        let position = load_position(&env, &staker);
        let reward = rewards::pending(
            &env,
            position.amount,
            pool.acc_reward_per_share,
            position.reward_debt,
        )?;

        let new_amount = position
            .amount
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let new_total = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let new_debt = rewards::reward_debt(&env, new_amount, pool.acc_reward_per_share)?;

        if reward > 0 && !ledger.is_manager(&engine) {
            return Err(ContractError::RewardMintUnauthorized);
        }

        // 2. Effects.
        store_pool(
            &env,
            &Pool {
                total_staked: new_total,
                ..pool
            },
        );
        store_position(
            &env,
            &staker,
            &Position {
                amount: new_amount,
                reward_debt: new_debt,
            },
        );

        // 3. Interactions: pay reward, then pull principal into custody.
        if reward > 0 {
            ledger.mint(&engine, &reward, &staker);
            events::publish_reward_paid(&env, staker.clone(), reward);
        }
        ledger.transfer_from(&engine, &staker, &engine, &amount);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(reward)
    }

    /// Return `amount` of `staker`'s principal together with every reward
    /// accrued on the pre-withdrawal position. Returns the reward paid.
    ///
    /// A positive reward is minted by the ledger, so while the engine is not
    /// a ledger manager the whole call, principal included, fails with
    /// `RewardMintUnauthorized` until `set_mgr` wires it in. A position with
    /// nothing owed withdraws regardless.
    ///
    /// If the accumulator or the owed amount cannot be represented the
    /// principal is still released: the position's unsettled reward is
    /// forfeited (`RWD_LOST`), the stored accumulator is left as it was, and
    /// `0` is returned.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let position = load_position(&env, &staker);
        if amount <= 0 || amount > position.amount {
            return Err(ContractError::InsufficientStake);
        }

        let ledger = Self::ledger_client(&env)?;
        let engine = env.current_contract_address();

        // 1. Advance the accumulator and settle against the pre-withdrawal amount.
        let stored = load_pool(&env);
        let settled = stored
            .accrued(&env, env.ledger().sequence())
            .and_then(|pool| {
                rewards::pending(
                    &env,
                    position.amount,
                    pool.acc_reward_per_share,
                    position.reward_debt,
                )
                .map(|reward| (pool, reward))
            });
        let (pool, reward, forfeited) = match settled {
            Ok((pool, reward)) => (pool, reward, false),
            Err(RewardError::Overflow) => (stored, 0, true),
            Err(err) => return Err(err.into()),
        };

        let new_amount = position.amount - amount;
        let new_total = pool
            .total_staked
            .checked_sub(amount)
            .filter(|t| *t >= 0)
            .ok_or(ContractError::InvariantViolation)?;
        let new_debt = rewards::reward_debt(&env, new_amount, pool.acc_reward_per_share)?;

        if reward > 0 && !ledger.is_manager(&engine) {
            return Err(ContractError::RewardMintUnauthorized);
        }

        // 2. Effects.
        store_pool(
            &env,
            &Pool {
                total_staked: new_total,
                ..pool
            },
        );
        store_position(
            &env,
            &staker,
            &Position {
                amount: new_amount,
                reward_debt: new_debt,
            },
        );

        // 3. Interactions: pay reward, then release principal.
        if forfeited {
            events::publish_reward_forfeited(&env, staker.clone(), position.amount);
        }
        if reward > 0 {
            ledger.mint(&engine, &reward, &staker);
            events::publish_reward_paid(&env, staker.clone(), reward);
        }
        ledger.transfer(&engine, &amount, &staker);

        events::publish_withdrawn(&env, staker, amount, new_total);

        Ok(reward)
    }

    /// Advance the global accumulator to the current sequence and return it.
    ///
    /// Safe to call at any time; repeated calls in the same sequence change
    /// nothing.
    pub fn refresh(env: Env) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let pool = load_pool(&env).accrued(&env, env.ledger().sequence())?;
        store_pool(&env, &pool);
        Ok(pool.acc_reward_per_share)
    }

    // ── Governance ──────────────────────────────────────────────────────────

    /// Record `manager`'s approval for the next reward-rate change. Returns
    /// the number of confirmations in the current round.
    pub fn confirm_change(env: Env, manager: Address) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        manager.require_auth();

        let count = multisig::confirm(&env, &manager)?;

        events::publish_change_confirmed(&env, manager, count);

        Ok(count)
    }

    /// Apply a new reward rate once every manager has confirmed.
    ///
    /// The accumulator is flushed at the old rate first, so blocks already
    /// elapsed are paid at the rate in force while they elapsed. All
    /// confirmations are cleared on success.
    pub fn set_reward_per_block(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        multisig::require_ready(&env, &caller)?;
        if new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        let pool = load_pool(&env).accrued(&env, env.ledger().sequence())?;
        let old_rate = pool.reward_per_block;
        store_pool(
            &env,
            &Pool {
                reward_per_block: new_rate,
                ..pool
            },
        );
        multisig::reset(&env);

        events::publish_reward_per_block_set(&env, caller, old_rate, new_rate);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the user's current staked balance.
    pub fn staked(env: Env, staker: Address) -> i128 {
        load_position(&env, &staker).amount
    }

    /// Return the sum of all currently staked tokens.
    pub fn total_staked(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    pub fn reward_per_block(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_PER_BLOCK).unwrap_or(0)
    }

    /// Stored accumulator value (as of `last_accrual_block`).
    pub fn acc_reward_per_share(env: Env) -> i128 {
        env.storage().instance().get(&ACC_REWARD_PER_SHARE).unwrap_or(0)
    }

    pub fn last_accrual_block(env: Env) -> u32 {
        env.storage().instance().get(&LAST_ACCRUAL_BLOCK).unwrap_or(0)
    }

    /// Return real-time pending rewards for a staker without mutating state.
    pub fn pending_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        Ok(Self::get_staker_info(env, staker)?.pending_rewards)
    }

    /// Return the combined staking position for a user.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let pool = load_pool(&env).accrued(&env, env.ledger().sequence())?;
        let position = load_position(&env, &staker);
        Ok(StakerInfo {
            staked: position.amount,
            reward_debt: position.reward_debt,
            pending_rewards: rewards::pending(
                &env,
                position.amount,
                pool.acc_reward_per_share,
                position.reward_debt,
            )?,
        })
    }

    pub fn managers(env: Env) -> Vec<Address> {
        multisig::managers(&env)
    }

    pub fn is_confirmed(env: Env, manager: Address) -> bool {
        multisig::is_confirmed(&env, &manager)
    }

    pub fn confirm_count(env: Env) -> u32 {
        multisig::confirm_count(&env)
    }

    pub fn governance_state(env: Env) -> GateState {
        multisig::state(&env)
    }

    pub fn ledger(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&LEDGER)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn ledger_client(env: &Env) -> Result<LedgerClient<'_>, ContractError> {
        let ledger = Self::ledger(env.clone())?;
        Ok(LedgerClient::new(env, &ledger))
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn load_pool(env: &Env) -> Pool {
    let storage = env.storage().instance();
    Pool {
        total_staked: storage.get(&TOTAL_STAKED).unwrap_or(0),
        reward_per_block: storage.get(&REWARD_PER_BLOCK).unwrap_or(0),
        acc_reward_per_share: storage.get(&ACC_REWARD_PER_SHARE).unwrap_or(0),
        last_accrual_block: storage.get(&LAST_ACCRUAL_BLOCK).unwrap_or(0),
    }
}

fn store_pool(env: &Env, pool: &Pool) {
    let storage = env.storage().instance();
    storage.set(&TOTAL_STAKED, &pool.total_staked);
    storage.set(&REWARD_PER_BLOCK, &pool.reward_per_block);
    storage.set(&ACC_REWARD_PER_SHARE, &pool.acc_reward_per_share);
    storage.set(&LAST_ACCRUAL_BLOCK, &pool.last_accrual_block);
}

fn load_position(env: &Env, staker: &Address) -> Position {
    let storage = env.storage().persistent();
    Position {
        amount: storage.get(&(USER_STAKE, staker.clone())).unwrap_or(0),
        reward_debt: storage.get(&(USER_DEBT, staker.clone())).unwrap_or(0),
    }
}

/// Persist `position`, dropping both entries once the stake is fully withdrawn.
fn store_position(env: &Env, staker: &Address, position: &Position) {
    let storage = env.storage().persistent();
    let stake_key = (USER_STAKE, staker.clone());
    let debt_key = (USER_DEBT, staker.clone());

    if position.amount == 0 {
        storage.remove(&stake_key);
        storage.remove(&debt_key);
        return;
    }

    storage.set(&stake_key, &position.amount);
    storage.set(&debt_key, &position.reward_debt);
    storage.extend_ttl(&stake_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    storage.extend_ttl(&debt_key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_governance;
