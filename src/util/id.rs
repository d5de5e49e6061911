//! Issue GUID generation and resolution.
//!
//! GUIDs are `0x` followed by 16 lowercase hex digits: the first 8 bytes of
//! a SHA256 over the creator, message, creation time and a nonce. Users may
//! refer to an issue by any unique prefix of its GUID, with or without the
//! `0x`.

use crate::error::{Result, RotsitError, find_similar_ids};
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Number of hex digits in a GUID after the `0x`.
pub const GUID_DIGITS: usize = 16;

/// Generate the seed string for GUID hashing.
#[must_use]
pub fn generate_id_seed(actor: &str, message: &str, created_at: DateTime<Local>, nonce: u32) -> String {
    format!(
        "{}|{}|{}|{}",
        actor,
        message,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

/// Hash a seed into a GUID.
#[must_use]
pub fn compute_guid(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let mut guid = String::with_capacity(GUID_DIGITS + 2);
    guid.push_str("0x");
    for byte in digest.iter().take(GUID_DIGITS / 2) {
        let _ = write!(guid, "{byte:02x}");
    }
    guid
}

/// Generate a GUID not already taken, bumping the nonce on collision.
#[must_use]
pub fn generate_guid<F>(actor: &str, message: &str, created_at: DateTime<Local>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut nonce = 0u32;
    loop {
        let guid = compute_guid(&generate_id_seed(actor, message, created_at, nonce));
        if !exists(&guid) {
            return guid;
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Normalize user input to the stored GUID spelling: lowercase, `0x`
/// prefixed.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    let lower = id.trim().to_lowercase();
    if lower.starts_with("0x") {
        lower
    } else {
        format!("0x{lower}")
    }
}

/// Check if a string is a complete GUID.
#[must_use]
pub fn is_valid_guid(id: &str) -> bool {
    id.strip_prefix("0x").is_some_and(|digits| {
        digits.len() == GUID_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// All IDs starting with the normalized form of `partial`.
#[must_use]
pub fn find_matching_ids<'a>(all_ids: &[&'a str], partial: &str) -> Vec<&'a str> {
    let prefix = normalize_id(partial);
    all_ids
        .iter()
        .copied()
        .filter(|id| id.to_lowercase().starts_with(&prefix))
        .collect()
}

/// How a user-supplied ID was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Prefix,
}

/// Resolve `input` against the known IDs.
///
/// # Errors
///
/// - `Validation` if the input is empty or not hexadecimal.
/// - `IssueNotFound` if no ID matches, carrying near-miss GUIDs.
/// - `AmbiguousId` if several IDs share the prefix.
pub fn resolve_id(input: &str, all_ids: &[&str]) -> Result<(String, MatchType)> {
    let normalized = normalize_id(input);
    let digits = &normalized[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RotsitError::validation("id", format!("'{input}' is not a hex GUID")));
    }

    if let Some(exact) = all_ids.iter().find(|id| id.eq_ignore_ascii_case(&normalized)) {
        return Ok(((*exact).to_string(), MatchType::Exact));
    }

    match find_matching_ids(all_ids, &normalized).as_slice() {
        [] => Err(RotsitError::IssueNotFound {
            id: input.to_string(),
            similar: find_similar_ids(&normalized, all_ids, 3),
        }),
        [only] => Ok(((*only).to_string(), MatchType::Prefix)),
        many => Err(RotsitError::AmbiguousId {
            partial: input.to_string(),
            matches: many.iter().map(|id| (*id).to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 19, 9, 30, 0)
            .earliest()
            .expect("valid time")
    }

    #[test]
    fn test_guid_shape() {
        init_test_logging();
        let guid = generate_guid("alice", "crash", at(), |_| false);
        assert!(is_valid_guid(&guid), "{guid}");
        assert_eq!(guid.len(), 18);
    }

    #[test]
    fn test_guid_is_deterministic() {
        init_test_logging();
        let a = compute_guid(&generate_id_seed("alice", "crash", at(), 0));
        let b = compute_guid(&generate_id_seed("alice", "crash", at(), 0));
        let c = compute_guid(&generate_id_seed("alice", "crash", at(), 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_collision_bumps_nonce() {
        init_test_logging();
        let taken = compute_guid(&generate_id_seed("alice", "crash", at(), 0));
        let guid = generate_guid("alice", "crash", at(), |id| id == taken);
        assert_ne!(guid, taken);
        assert_eq!(guid, compute_guid(&generate_id_seed("alice", "crash", at(), 1)));
    }

    #[test]
    fn test_normalize_id() {
        init_test_logging();
        assert_eq!(normalize_id("ABC"), "0xabc");
        assert_eq!(normalize_id(" 0XAbc "), "0xabc");
        assert_eq!(normalize_id("0x12"), "0x12");
    }

    #[test]
    fn test_resolve_id() {
        init_test_logging();
        let ids = ["0x1234000000000000", "0x1235000000000000", "0xffff000000000000"];

        let (id, kind) = resolve_id("0x1234000000000000", &ids).unwrap();
        assert_eq!((id.as_str(), kind), ("0x1234000000000000", MatchType::Exact));

        let (id, kind) = resolve_id("FFF", &ids).unwrap();
        assert_eq!((id.as_str(), kind), ("0xffff000000000000", MatchType::Prefix));

        assert!(matches!(
            resolve_id("123", &ids),
            Err(RotsitError::AmbiguousId { matches, .. }) if matches.len() == 2
        ));
        assert!(matches!(resolve_id("0xaa", &ids), Err(RotsitError::IssueNotFound { .. })));
        assert!(matches!(resolve_id("", &ids), Err(RotsitError::Validation { .. })));

        let Err(RotsitError::IssueNotFound { similar, .. }) = resolve_id("0x1234000000000001", &ids)
        else {
            panic!("expected not found");
        };
        assert_eq!(similar, ["0x1234000000000000", "0x1235000000000000"]);
        assert!(matches!(resolve_id("xyz", &ids), Err(RotsitError::Validation { .. })));
    }
}
