//! Cross-contract interface to the token ledger.
//!
//! The staking engine only needs the subset declared here. Mutating calls
//! panic inside the ledger on failure, which aborts the whole invocation, so
//! callers check balances, allowances and minter status through the view
//! functions before issuing them.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "LedgerClient")]
pub trait LedgerInterface {
    fn balance_of(env: Env, addr: Address) -> i128;

    fn allowance(env: Env, owner: Address, spender: Address) -> i128;

    fn is_manager(env: Env, addr: Address) -> bool;

    /// Move `amount` from `from` to `to`. `from` must authorise the call.
    fn transfer(env: Env, from: Address, amount: i128, to: Address);

    /// Move `amount` from `owner` to `to` against `spender`'s allowance.
    fn transfer_from(env: Env, spender: Address, owner: Address, to: Address, amount: i128);

    /// Create `amount` new tokens for `to`. `caller` must be a ledger manager.
    fn mint(env: Env, caller: Address, amount: i128, to: Address);
}
