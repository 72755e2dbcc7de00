// Rust guideline compliant 2026-10-19

//! ID resolution helpers for Threadswap.

use crate::error::Result;
use threadswap_core::identity::{self, IdKind};
use threadswap_core::{Error as CoreError, Snapshot};

/// Resolves a partial item ID to its canonical full ID.
///
/// # Errors
///
/// Returns an error if the partial ID is invalid, ambiguous, or not found.
pub fn resolve_item_id(partial: &str, snapshot: &Snapshot) -> Result<String> {
    let ids = snapshot.items().map(|item| item.id.as_str());
    Ok(identity::resolve_partial_id(IdKind::Item, partial, ids)?)
}

/// Resolves a partial swap request ID to its canonical full ID.
///
/// # Errors
///
/// Returns an error if the partial ID is invalid, ambiguous, or not found.
pub fn resolve_swap_id(partial: &str, snapshot: &Snapshot) -> Result<String> {
    let ids = snapshot.swaps().map(|swap| swap.id.as_str());
    Ok(identity::resolve_partial_id(IdKind::Swap, partial, ids)?)
}

/// Resolves a partial ledger entry ID to its canonical full ID.
///
/// # Errors
///
/// Returns an error if the partial ID is invalid, ambiguous, or not found.
pub fn resolve_transaction_id(partial: &str, snapshot: &Snapshot) -> Result<String> {
    let ids = snapshot.transactions().iter().map(|txn| txn.id.as_str());
    Ok(identity::resolve_partial_id(IdKind::Transaction, partial, ids)?)
}

/// Resolves a username or partial user ID to a full user ID.
///
/// Usernames win over ID prefixes.
///
/// # Errors
///
/// Returns an error if nothing matches or a partial ID is ambiguous.
pub fn resolve_user(reference: &str, snapshot: &Snapshot) -> Result<String> {
    let reference = reference.trim().trim_start_matches('@');
    if let Some(user) = snapshot.user_by_username(reference) {
        return Ok(user.id.clone());
    }
    let ids = snapshot.users().map(|user| user.id.as_str());
    identity::resolve_partial_id(IdKind::User, reference, ids).map_err(|err| match err {
        CoreError::InvalidArgument(_) => {
            CoreError::NotFound(format!("user {}", reference)).into()
        }
        other => other.into(),
    })
}
