//! One-way hashing for verification codes and transient secrets.
//!
//! Digests are deterministic functions of the input only (no stored salt
//! state), so independent processes can compare codes without coordination.
//! Comparison is constant-time to resist timing side-channels.

use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Hash a secret into a stable digest string.
///
/// SHA-256, base64url-encoded without padding (43 characters).
///
/// # Examples
///
/// ```
/// # use family_ledger_auth::hash::hash_secret;
/// let digest = hash_secret("483920");
/// assert_eq!(digest.len(), 43);
/// assert_eq!(digest, hash_secret("483920"));
/// ```
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

/// Compare a secret against a stored digest in constant time.
///
/// # Examples
///
/// ```
/// # use family_ledger_auth::hash::{compare_secret, hash_secret};
/// let digest = hash_secret("483920");
/// assert!(compare_secret("483920", &digest));
/// assert!(!compare_secret("000000", &digest));
/// ```
#[must_use]
pub fn compare_secret(secret: &str, digest: &str) -> bool {
    let computed = hash_secret(secret);
    constant_time_eq::constant_time_eq(computed.as_bytes(), digest.as_bytes())
}

/// Generate a zero-padded numeric code of `length` digits.
///
/// Uniform over the full `10^length` range, so leading zeros occur with
/// their natural frequency.
///
/// # Panics
///
/// Does not panic for lengths up to 18 digits; longer codes overflow the
/// underlying integer range and are not supported.
#[must_use]
pub fn generate_numeric_code(length: u32) -> String {
    let bound = 10u64.pow(length.min(18));
    let value = rand::thread_rng().gen_range(0..bound);
    format!("{value:0width$}", width = length as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_are_deterministic_and_distinct() {
        assert_eq!(hash_secret("123456"), hash_secret("123456"));
        assert_ne!(hash_secret("123456"), hash_secret("123457"));
    }

    #[test]
    fn compare_rejects_mangled_digests() {
        let digest = hash_secret("123456");
        assert!(compare_secret("123456", &digest));
        assert!(!compare_secret("123456", &digest[1..]));
        assert!(!compare_secret("123456", ""));
    }

    #[test]
    fn generated_codes_have_requested_shape() {
        for _ in 0..100 {
            let code = generate_numeric_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_numeric_code(6)).collect();
        // 50 draws from a million values colliding down to one is not credible.
        assert!(codes.len() > 1);
    }
}
