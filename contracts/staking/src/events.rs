#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub ledger: Address,
    pub managers: Vec<Address>,
    pub reward_per_block: i128,
    pub block: u32,
    pub timestamp: u64,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub block: u32,
    pub timestamp: u64,
}

/// Fired when a user withdraws principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub block: u32,
    pub timestamp: u64,
}

/// Fired when accrued reward is minted to a staker.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
    pub timestamp: u64,
}

/// Fired when a withdrawal releases principal without settling reward,
/// because the owed amount could not be represented.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardForfeitedEvent {
    pub staker: Address,
    pub staked: i128,
    pub block: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangeConfirmedEvent {
    pub manager: Address,
    pub confirm_count: u32,
    pub timestamp: u64,
}

/// Fired when a unanimously confirmed rate change is applied.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPerBlockSetEvent {
    pub set_by: Address,
    pub old_rate: i128,
    pub new_rate: i128,
    pub block: u32,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    ledger: Address,
    managers: Vec<Address>,
    reward_per_block: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            ledger,
            managers,
            reward_per_block,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_staked,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            new_total_staked,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone()),
        RewardPaidEvent {
            staker,
            amount,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_forfeited(env: &Env, staker: Address, staked: i128) {
    env.events().publish(
        (symbol_short!("RWD_LOST"), staker.clone()),
        RewardForfeitedEvent {
            staker,
            staked,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_change_confirmed(env: &Env, manager: Address, confirm_count: u32) {
    env.events().publish(
        (symbol_short!("CONFIRMED"), manager.clone()),
        ChangeConfirmedEvent {
            manager,
            confirm_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_per_block_set(env: &Env, set_by: Address, old_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RWD_RATE"),),
        RewardPerBlockSetEvent {
            set_by,
            old_rate,
            new_rate,
            block: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        },
    );
}
