//! Sealing of pending credentials at rest.
//!
//! A registration record has to carry the registrant's credential for up to
//! 30 minutes so it can be replayed into the identity store (which applies
//! its own hashing) once the email is verified. It is never stored in
//! plaintext: the credential is sealed with AES-256-GCM under a configured
//! key and only opened at provisioning time.
//!
//! The sealed blob is `base64url(nonce || ciphertext)` with a fresh random
//! 96-bit nonce per seal, so nonce reuse is not a concern.

use crate::error::{AuthError, Result};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Nonce length for AES-GCM (96 bits).
const NONCE_LEN: usize = 12;

/// An opaque sealed credential, safe to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedCredential {
    /// base64url-encoded `nonce || ciphertext`.
    pub blob: String,
}

/// Seals and opens pending credentials with AES-256-GCM.
#[derive(Clone)]
pub struct CredentialSealer {
    cipher: Arc<Aes256Gcm>,
}

impl std::fmt::Debug for CredentialSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The cipher holds key material; never derive Debug over it.
        f.debug_struct("CredentialSealer").finish_non_exhaustive()
    }
}

impl CredentialSealer {
    /// Create a sealer from a 32-byte AES-256 key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the key is not exactly
    /// 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != 32 {
            tracing::error!(
                key_len = key.len(),
                "credential sealing key must be 32 bytes"
            );
            return Err(AuthError::InternalError);
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| AuthError::InternalError)?;
        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    /// Seal a plaintext credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if encryption fails; the caller
    /// treats this as a server error, not a validation error.
    pub fn seal(&self, plaintext: &str) -> Result<SealedCredential> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| {
                tracing::error!("failed to seal pending credential");
                AuthError::InternalError
            })?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        Ok(SealedCredential {
            blob: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw),
        })
    }

    /// Open a sealed credential back into plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the blob is malformed or was
    /// sealed under a different key.
    pub fn open(&self, sealed: &SealedCredential) -> Result<String> {
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(&sealed.blob)
            .map_err(|_| AuthError::InternalError)?;
        if raw.len() <= NONCE_LEN {
            return Err(AuthError::InternalError);
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::clone_from_slice(nonce_bytes);
        let plaintext = self.cipher.decrypt(&nonce, ciphertext).map_err(|_| {
            tracing::error!("failed to open sealed credential");
            AuthError::InternalError
        })?;

        String::from_utf8(plaintext).map_err(|_| AuthError::InternalError)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sealer(byte: u8) -> CredentialSealer {
        CredentialSealer::new(&[byte; 32]).unwrap()
    }

    #[test]
    fn seal_then_open_round_trips() {
        let sealer = sealer(7);
        let sealed = sealer.seal("P@ssw0rd1").and_then(|s| sealer.open(&s));
        assert_eq!(sealed, Ok("P@ssw0rd1".to_string()));
    }

    #[test]
    fn each_seal_uses_a_fresh_nonce() {
        let sealer = sealer(7);
        let a = sealer.seal("P@ssw0rd1");
        let b = sealer.seal("P@ssw0rd1");
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_cannot_open() {
        let sealed = sealer(7).seal("P@ssw0rd1").unwrap();
        assert_eq!(sealer(8).open(&sealed), Err(AuthError::InternalError));
    }

    #[test]
    fn key_must_be_32_bytes() {
        assert!(CredentialSealer::new(&[0u8; 16]).is_err());
        assert!(CredentialSealer::new(&[0u8; 32]).is_ok());
    }

    #[test]
    fn garbage_blobs_are_rejected() {
        let sealer = sealer(7);
        let garbage = SealedCredential {
            blob: "not-base64!!".to_string(),
        };
        assert_eq!(sealer.open(&garbage), Err(AuthError::InternalError));
        let too_short = SealedCredential {
            blob: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([0u8; 4]),
        };
        assert_eq!(sealer.open(&too_short), Err(AuthError::InternalError));
    }
}
