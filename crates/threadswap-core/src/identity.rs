// Rust guideline compliant 2026-10-19

//! Hash-based identifiers for Threadswap records.
//!
//! Identifiers look like `itm-1a2b3c4d`: a kind prefix, a dash, and the first
//! eight hex digits of a SHA-256 over the seed fields, a timestamp and a nonce.

use crate::{Error, Result};
use sha2::{Digest, Sha256};

/// Number of hex digits after the prefix.
pub const HASH_LEN: usize = 8;

/// Minimum number of hex digits accepted in a partial identifier.
pub const MIN_PARTIAL_LEN: usize = 3;

/// Record kind encoded in an identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Item,
    User,
    Swap,
    Transaction,
}

impl IdKind {
    /// Returns the three-letter prefix for the kind.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Item => "itm",
            IdKind::User => "usr",
            IdKind::Swap => "swp",
            IdKind::Transaction => "txn",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "itm" => Some(IdKind::Item),
            "usr" => Some(IdKind::User),
            "swp" => Some(IdKind::Swap),
            "txn" => Some(IdKind::Transaction),
            _ => None,
        }
    }
}

/// Generates an identifier for a record of `kind`.
///
/// # Arguments
///
/// * `kind` - Record kind
/// * `seed` - Fields that distinguish the record
/// * `timestamp` - Creation time
/// * `nonce` - Collision counter; bump it and retry on a clash
pub fn generate_id(kind: IdKind, seed: &[&str], timestamp: i64, nonce: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.prefix().as_bytes());
    for part in seed {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(timestamp.to_le_bytes());
    hasher.update(nonce.to_le_bytes());

    let hex = format!("{:x}", hasher.finalize());
    format!("{}-{}", kind.prefix(), &hex[..HASH_LEN])
}

/// Generates an identifier that `exists` does not already know.
pub fn generate_unique_id<F>(kind: IdKind, seed: &[&str], timestamp: i64, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut nonce = 0u32;
    loop {
        let id = generate_id(kind, seed, timestamp, nonce);
        if !exists(&id) {
            return id;
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Validates the shape of a full identifier.
///
/// # Errors
///
/// Returns `InvalidArgument` if the prefix is unknown or the hash part is not
/// eight lowercase hex digits.
pub fn validate_id_format(id: &str) -> Result<()> {
    let (prefix, hash) = id
        .split_once('-')
        .ok_or_else(|| Error::InvalidArgument(format!("Malformed ID: {}", id)))?;
    if IdKind::from_prefix(prefix).is_none() {
        return Err(Error::InvalidArgument(format!(
            "Unknown ID prefix '{}' in {}",
            prefix, id
        )));
    }
    if hash.len() != HASH_LEN || !hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return Err(Error::InvalidArgument(format!("Malformed ID: {}", id)));
    }
    Ok(())
}

/// Resolves a partial identifier against known identifiers of one kind.
///
/// Accepts a full ID, a prefixed partial (`itm-1a2`) or a bare hash
/// partial (`1a2`).
///
/// # Errors
///
/// Returns an error if:
/// - The partial is shorter than three hex digits (`InvalidArgument`)
/// - Nothing matches (`NotFound`)
/// - Several identifiers match (`AmbiguousId`)
pub fn resolve_partial_id<'a, I>(kind: IdKind, partial: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let partial = partial.trim().to_lowercase();
    let hash_part = match partial.split_once('-') {
        Some((prefix, rest)) if prefix == kind.prefix() => rest.to_string(),
        Some(_) => return Err(Error::NotFound(partial)),
        None => partial.clone(),
    };

    if hash_part.len() < MIN_PARTIAL_LEN {
        return Err(Error::InvalidArgument(format!(
            "ID '{}' must include at least {} characters",
            partial, MIN_PARTIAL_LEN
        )));
    }

    let needle = format!("{}-{}", kind.prefix(), hash_part);
    let mut matches: Vec<String> = ids
        .into_iter()
        .filter(|id| id.starts_with(&needle))
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => Err(Error::NotFound(partial)),
        1 => Ok(matches.remove(0)),
        _ => {
            if let Some(exact) = matches.iter().find(|id| **id == needle) {
                return Ok(exact.clone());
            }
            Err(Error::AmbiguousId(partial, matches))
        }
    }
}
