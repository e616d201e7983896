//! Membership verification code generation.
//!
//! A pending membership link carries a single-use code that the counterpart
//! (the subject for an invitation, an admin for a request) must present back
//! to approve or decline the link. The code is seeded with the current time
//! and a random nonce, so it cannot be reproduced from the community and
//! user identifiers alone.

use chrono::Utc;

use crate::crypto::sha256_hex;

/// Sentinel mixed into the code seed.
const CODE_SENTINEL: &str = "communitas-membership";

/// Number of hex characters kept from the digest.
const CODE_HEX_LEN: usize = 9;

/// Generates a verification code for a pending (community, user) link.
///
/// The code is an underscore followed by 9 hex characters, e.g. `_3fa84c21e`.
pub fn membership_code(community_id: i64, user_id: i64) -> String {
    let nonce: u64 = rand::random();
    let seed = format!(
        "{}-{}-^{}!!{}<>{}",
        Utc::now().format("%Y-%m-%d-%H:%M:%S%.9f"),
        nonce,
        CODE_SENTINEL,
        community_id,
        user_id
    );
    let digest = sha256_hex(&seed);
    format!("_{}", &digest[..CODE_HEX_LEN])
}

/// Derives a short code for a community created without one.
///
/// Built from the lowercased alphanumeric prefix of the name, a random
/// three-digit suffix and the creator's id. Uniqueness is still enforced
/// by the database index; this only makes collisions unlikely.
pub fn derive_short_code(name: &str, creator_id: i64) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase();
    let suffix: u16 = rand::random::<u16>() % 1000;
    format!("{}{}{}", prefix, suffix, creator_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        let code = membership_code(1, 2);
        assert_eq!(code.len(), 1 + CODE_HEX_LEN);
        assert!(code.starts_with('_'));
        assert!(code[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_codes_differ_across_calls() {
        // Same pair, different nonce: the code must not be a pure function
        // of the identifiers.
        let codes: HashSet<String> = (0..50).map(|_| membership_code(42, 7)).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_codes_differ_across_pairs() {
        let a = membership_code(1, 1);
        let b = membership_code(2, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derived_short_code_is_lowercase_alphanumeric() {
        let code = derive_short_code("St. John's Parish", 17);
        assert!(code.starts_with("stjohnsp"));
        assert!(code.ends_with("17"));
        assert!(code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_derived_short_code_handles_short_names() {
        let code = derive_short_code("Om", 3);
        assert!(code.starts_with("om"));
        assert!(code.ends_with('3'));
    }
}
