extern crate std;

use common::multisig::GateState;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, Env, Vec,
};

use crate::{ContractError, StakingContract, StakingContractClient};

const UNIT: i128 = 1_000_000_000_000_000_000;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// The gate never touches the ledger, so a placeholder address is enough.
fn setup() -> (Env, StakingContractClient<'static>, Vec<Address>) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(1);

    let managers = Vec::from_array(
        &env,
        [
            Address::generate(&env),
            Address::generate(&env),
            Address::generate(&env),
        ],
    );

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);
    client.initialize(&Address::generate(&env), &managers, &UNIT);

    (env, client, managers)
}

fn confirm_all(client: &StakingContractClient<'static>, managers: &Vec<Address>) {
    for m in managers.iter() {
        client.confirm_change(&m);
    }
}

// ── Construction ─────────────────────────────────────────────────────────────

#[test]
fn test_initialize_rejects_empty_managers() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let result = client.try_initialize(&Address::generate(&env), &Vec::new(&env), &UNIT);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidManagers),
        _ => unreachable!("Expected InvalidManagers error"),
    }
    assert!(!client.is_initialized());
}

#[test]
fn test_initialize_rejects_duplicate_managers() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let m = Address::generate(&env);
    let managers = Vec::from_array(&env, [m.clone(), Address::generate(&env), m]);
    let result = client.try_initialize(&Address::generate(&env), &managers, &UNIT);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidManagers),
        _ => unreachable!("Expected InvalidManagers error"),
    }
}

#[test]
fn test_initialize_rejects_negative_rate() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let managers = Vec::from_array(&env, [Address::generate(&env)]);
    let result = client.try_initialize(&Address::generate(&env), &managers, &-1);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

// ── Authorization ────────────────────────────────────────────────────────────

#[test]
fn test_non_manager_cannot_set_rate() {
    let (env, client, _managers) = setup();

    let hacker = Address::generate(&env);
    let result = client.try_set_reward_per_block(&hacker, &(10_000 * UNIT));
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAManager),
        _ => unreachable!("Expected NotAManager error"),
    }
    assert_eq!(client.reward_per_block(), UNIT);
}

#[test]
fn test_non_manager_cannot_confirm() {
    let (env, client, _managers) = setup();

    let hacker = Address::generate(&env);
    match client.try_confirm_change(&hacker) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAManager),
        _ => unreachable!("Expected NotAManager error"),
    }
    assert_eq!(client.confirm_count(), 0);
    assert!(!client.is_confirmed(&hacker));
}

#[test]
fn test_non_manager_cannot_set_rate_even_when_ready() {
    let (env, client, managers) = setup();
    confirm_all(&client, &managers);

    let hacker = Address::generate(&env);
    match client.try_set_reward_per_block(&hacker, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAManager),
        _ => unreachable!("Expected NotAManager error"),
    }
    assert_eq!(client.governance_state(), GateState::Ready);
}

// ── Confirmation round ───────────────────────────────────────────────────────

#[test]
fn test_partial_confirmation_is_not_enough() {
    let (_env, client, managers) = setup();

    client.confirm_change(&managers.get(0).unwrap());
    client.confirm_change(&managers.get(1).unwrap());

    let result = client.try_set_reward_per_block(&managers.get(0).unwrap(), &(10_000 * UNIT));
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllConfirmed),
        _ => unreachable!("Expected NotAllConfirmed error"),
    }
    assert_eq!(client.reward_per_block(), UNIT);
    assert_eq!(client.confirm_count(), 2);
}

#[test]
fn test_unanimous_confirmation_allows_change() {
    let (_env, client, managers) = setup();
    confirm_all(&client, &managers);

    client.set_reward_per_block(&managers.get(0).unwrap(), &(10_000 * UNIT));
    assert_eq!(client.reward_per_block(), 10_000 * UNIT);
}

#[test]
fn test_confirmations_reset_after_change() {
    let (_env, client, managers) = setup();
    confirm_all(&client, &managers);
    let m0 = managers.get(0).unwrap();

    client.set_reward_per_block(&m0, &(10_000 * UNIT));

    assert_eq!(client.confirm_count(), 0);
    assert_eq!(client.governance_state(), GateState::Idle);
    for m in managers.iter() {
        assert!(!client.is_confirmed(&m));
    }

    match client.try_set_reward_per_block(&m0, &(20_000 * UNIT)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllConfirmed),
        _ => unreachable!("Expected NotAllConfirmed error"),
    }
    assert_eq!(client.reward_per_block(), 10_000 * UNIT);
}

#[test]
fn test_double_confirm_is_rejected() {
    let (_env, client, managers) = setup();
    let m0 = managers.get(0).unwrap();

    assert_eq!(client.confirm_change(&m0), 1);
    match client.try_confirm_change(&m0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::AlreadyConfirmed),
        _ => unreachable!("Expected AlreadyConfirmed error"),
    }
    assert_eq!(client.confirm_count(), 1);
    assert!(client.is_confirmed(&m0));
}

#[test]
fn test_manager_can_reconfirm_after_reset() {
    let (_env, client, managers) = setup();
    let m0 = managers.get(0).unwrap();
    confirm_all(&client, &managers);
    client.set_reward_per_block(&m0, &(2 * UNIT));

    // A fresh round accepts every manager again and can complete.
    assert_eq!(client.confirm_change(&m0), 1);
    assert!(client.is_confirmed(&m0));
    confirm_all_except(&client, &managers, &m0);
    client.set_reward_per_block(&m0, &(3 * UNIT));
    assert_eq!(client.reward_per_block(), 3 * UNIT);
}

fn confirm_all_except(
    client: &StakingContractClient<'static>,
    managers: &Vec<Address>,
    skip: &Address,
) {
    for m in managers.iter() {
        if m != *skip {
            client.confirm_change(&m);
        }
    }
}

#[test]
fn test_governance_state_transitions() {
    let (_env, client, managers) = setup();

    assert_eq!(client.governance_state(), GateState::Idle);
    client.confirm_change(&managers.get(0).unwrap());
    assert_eq!(client.governance_state(), GateState::Confirming);
    client.confirm_change(&managers.get(1).unwrap());
    assert_eq!(client.governance_state(), GateState::Confirming);
    client.confirm_change(&managers.get(2).unwrap());
    assert_eq!(client.governance_state(), GateState::Ready);

    client.set_reward_per_block(&managers.get(2).unwrap(), &0);
    assert_eq!(client.governance_state(), GateState::Idle);
    assert_eq!(client.reward_per_block(), 0);
}

#[test]
fn test_negative_rate_keeps_round_open() {
    let (_env, client, managers) = setup();
    confirm_all(&client, &managers);
    let m0 = managers.get(0).unwrap();

    match client.try_set_reward_per_block(&m0, &-5) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
    assert_eq!(client.confirm_count(), 3);
    assert_eq!(client.reward_per_block(), UNIT);

    client.set_reward_per_block(&m0, &(5 * UNIT));
    assert_eq!(client.reward_per_block(), 5 * UNIT);
}
