//! Shared helpers for the Tiny Bank contract suite.
//!
//! This crate provides:
//! - [`managers`] — validation and lookup over fixed manager address sets.
//! - [`multisig`] — the unanimous confirmation gate guarding sensitive
//!   parameter changes.
//! - [`ledger`] — the cross-contract client the staking engine uses to talk
//!   to the token ledger.
//!
//! Helper errors are plain enums; each contract maps them into its own
//! `#[contracterror]` type at the call site.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod ledger;
pub mod managers;
pub mod multisig;

pub use ledger::*;
pub use managers::*;
pub use multisig::*;
