//! Unanimous confirmation gate for Soroban contracts.
//!
//! A fixed set of managers is registered once. Each manager confirms at most
//! once per round; when every manager has confirmed the gate is `Ready` and
//! the guarded action may run exactly once, after which [`reset`] clears the
//! round.
//!
//! All state lives in instance storage so it shares the contract's lifetime.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::managers::{contains_manager, validate_managers};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const MSIG_MGRS: Symbol = symbol_short!("MSIG_MGRS");
const MSIG_CNT: Symbol = symbol_short!("MSIG_CNT");
const MSIG_CONF: Symbol = symbol_short!("MSIG_CONF");

// ── Types ────────────────────────────────────────────────────────────────────

/// Phase of the current confirmation round.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateState {
    /// No manager has confirmed.
    Idle,
    /// Some, but not all, managers have confirmed.
    Confirming,
    /// Every manager has confirmed; the guarded action may run.
    Ready,
}

/// Errors specific to the confirmation gate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MultisigError {
    /// Manager list is empty or contains duplicates.
    InvalidConfig,
    /// The caller is not one of the configured managers.
    NotAManager,
    /// The caller already confirmed in the current round.
    AlreadyConfirmed,
    /// At least one manager has not confirmed yet.
    NotAllConfirmed,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn confirmed_key(manager: &Address) -> (Symbol, Address) {
    (MSIG_CONF, manager.clone())
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Register the manager set and start an empty round.
///
/// # Errors
/// Returns `MultisigError::InvalidConfig` if `managers` is empty or holds a
/// duplicate address.
pub fn configure(env: &Env, managers: Vec<Address>) -> Result<(), MultisigError> {
    validate_managers(&managers).map_err(|_| MultisigError::InvalidConfig)?;
    env.storage().instance().set(&MSIG_MGRS, &managers);
    env.storage().instance().set(&MSIG_CNT, &0u32);
    Ok(())
}

/// Return the configured managers (empty before [`configure`]).
pub fn managers(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&MSIG_MGRS)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn is_manager(env: &Env, addr: &Address) -> bool {
    contains_manager(&managers(env), addr)
}

/// Whether `manager` has confirmed in the current round.
pub fn is_confirmed(env: &Env, manager: &Address) -> bool {
    env.storage()
        .instance()
        .get(&confirmed_key(manager))
        .unwrap_or(false)
}

pub fn confirm_count(env: &Env) -> u32 {
    env.storage().instance().get(&MSIG_CNT).unwrap_or(0)
}

/// Record a confirmation from `manager` and return the new count.
///
/// # Errors
/// - `NotAManager` if `manager` is not in the configured set.
/// - `AlreadyConfirmed` if `manager` confirmed earlier in this round.
pub fn confirm(env: &Env, manager: &Address) -> Result<u32, MultisigError> {
    if !is_manager(env, manager) {
        return Err(MultisigError::NotAManager);
    }
    if is_confirmed(env, manager) {
        return Err(MultisigError::AlreadyConfirmed);
    }

    let count = confirm_count(env).saturating_add(1);
    env.storage().instance().set(&confirmed_key(manager), &true);
    env.storage().instance().set(&MSIG_CNT, &count);
    Ok(count)
}

/// Verify that `caller` may run the guarded action now.
///
/// Does not consume the round; call [`reset`] once the action has been
/// applied.
///
/// # Errors
/// - `NotAManager` if `caller` is not in the configured set.
/// - `NotAllConfirmed` if the round is not unanimous.
pub fn require_ready(env: &Env, caller: &Address) -> Result<(), MultisigError> {
    let mgrs = managers(env);
    if !contains_manager(&mgrs, caller) {
        return Err(MultisigError::NotAManager);
    }
    if mgrs.is_empty() || confirm_count(env) != mgrs.len() {
        return Err(MultisigError::NotAllConfirmed);
    }
    Ok(())
}

/// Clear every confirmation and zero the counter.
pub fn reset(env: &Env) {
    for manager in managers(env).iter() {
        env.storage().instance().remove(&confirmed_key(&manager));
    }
    env.storage().instance().set(&MSIG_CNT, &0u32);
}

pub fn state(env: &Env) -> GateState {
    let count = confirm_count(env);
    let total = managers(env).len();
    if count == 0 {
        GateState::Idle
    } else if count < total {
        GateState::Confirming
    } else {
        GateState::Ready
    }
}
