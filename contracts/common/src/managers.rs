//! Validation helpers for fixed manager address sets.

use soroban_sdk::{Address, Vec};

/// Reasons a proposed manager list is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ManagerSetError {
    /// The list contains no addresses.
    Empty,
    /// The same address appears more than once.
    Duplicate,
}

/// Check that `managers` is non-empty and contains no repeated address.
pub fn validate_managers(managers: &Vec<Address>) -> Result<(), ManagerSetError> {
    if managers.is_empty() {
        return Err(ManagerSetError::Empty);
    }
    let len = managers.len();
    for i in 0..len {
        let Some(a) = managers.get(i) else { continue };
        for j in (i + 1)..len {
            if managers.get(j).as_ref() == Some(&a) {
                return Err(ManagerSetError::Duplicate);
            }
        }
    }
    Ok(())
}

/// Returns `true` when `addr` is a member of `managers`.
pub fn contains_manager(managers: &Vec<Address>, addr: &Address) -> bool {
    managers.iter().any(|m| m == *addr)
}
