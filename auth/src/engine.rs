//! Verification code engine.
//!
//! State machine governing one code's lifecycle per email:
//!
//! ```text
//! (create) ──► Pending ──┬── matching code, in window ──► Verified (terminal)
//!                ▲  │    ├── wrong code, budget left ───► Pending
//!                │  │    ├── wrong code, budget spent ──► Locked   (terminal)
//!                │  │    └── window elapsed (lazy) ─────► Expired  (terminal)
//!                │  │
//!                └──┴── resend replaces the record: fresh code, fresh
//!                       window, attempt count back to zero
//! ```
//!
//! Expiry is evaluated lazily against the injected clock when a record is
//! read; an expired pending record is treated as `Expired` for the current
//! request and deleted so stale retries cannot linger. The `Pending` →
//! `Verified` transition and the attempt increment both go through the
//! store's conditional operations, which serializes concurrent attempts for
//! the same email.

use crate::config::AuthConfig;
use crate::environment::Clock;
use crate::error::{AuthError, Result};
use crate::hash;
use crate::providers::VerificationCodeStore;
use crate::state::{CodeStatus, VerificationCode};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// A freshly issued code, before email dispatch.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Plaintext numeric code. Handed to the email gateway and then
    /// dropped; only its digest is stored.
    pub code: String,

    /// When the code was issued.
    pub issued_at: DateTime<Utc>,

    /// When the code stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Drives verification code records through their state machine.
#[derive(Clone)]
pub struct VerificationEngine<C>
where
    C: VerificationCodeStore + Clone,
{
    codes: C,
    clock: Arc<dyn Clock>,
    code_length: u32,
    code_ttl: Duration,
    max_attempts: u32,
}

impl<C> VerificationEngine<C>
where
    C: VerificationCodeStore + Clone,
{
    /// Create an engine over a code store and clock.
    #[must_use]
    pub fn new(codes: C, clock: Arc<dyn Clock>, config: &AuthConfig) -> Self {
        Self {
            codes,
            clock,
            code_length: config.code_length,
            code_ttl: config.code_ttl,
            max_attempts: config.max_attempts,
        }
    }

    /// Issue a brand-new code for an email, replacing any prior record.
    ///
    /// The fresh record starts `Pending` with a zeroed attempt count and a
    /// full expiry window, which is also how resend escapes the terminal
    /// states.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be written.
    pub async fn issue(&self, email: &str) -> Result<IssuedCode> {
        let now = self.clock.now();
        let code = hash::generate_numeric_code(self.code_length);
        let record = VerificationCode {
            email: email.to_string(),
            code_digest: hash::hash_secret(&code),
            attempt_count: 0,
            max_attempts: self.max_attempts,
            status: CodeStatus::Pending,
            created_at: now,
            expires_at: now + self.code_ttl,
            verified_at: None,
        };
        self.codes.create(&record).await?;

        Ok(IssuedCode {
            code,
            issued_at: now,
            expires_at: record.expires_at,
        })
    }

    /// Drive one verify attempt for an email.
    ///
    /// On success the record has transitioned `Pending` → `Verified` and
    /// this attempt owns the transition exclusively; the caller may
    /// provision. On expiry the code record has already been deleted.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RegistrationNotFound`] - no live code for this email
    ///   (also reported when a concurrent attempt consumed the code first)
    /// - [`AuthError::CodeLocked`] - attempt budget exhausted, now or
    ///   previously
    /// - [`AuthError::CodeExpired`] - code window elapsed (lazy transition)
    /// - [`AuthError::CodeInvalid`] - wrong code, with remaining attempts
    /// - [`AuthError::StorageError`] - the store failed
    pub async fn verify(&self, email: &str, submitted: &str) -> Result<()> {
        let Some(record) = self.codes.get(email).await? else {
            return Err(AuthError::RegistrationNotFound);
        };

        match record.status {
            CodeStatus::Locked => Err(AuthError::CodeLocked),
            CodeStatus::Expired => {
                self.codes.delete(email).await?;
                Err(AuthError::CodeExpired)
            }
            // A verified row still around means this flow already finished;
            // the only path forward is a fresh registration.
            CodeStatus::Verified => Err(AuthError::RegistrationNotFound),
            CodeStatus::Pending => self.verify_pending(&record, submitted).await,
        }
    }

    async fn verify_pending(&self, record: &VerificationCode, submitted: &str) -> Result<()> {
        let now = self.clock.now();
        if record.is_expired(now) {
            // Lazy expiry: drop the record so stale retries surface as
            // not-found instead of replaying an old window.
            self.codes.delete(&record.email).await?;
            return Err(AuthError::CodeExpired);
        }

        if !hash::compare_secret(submitted, &record.code_digest) {
            return match self.codes.record_failed_attempt(&record.email).await? {
                None => Err(AuthError::RegistrationNotFound),
                Some(updated) if updated.status == CodeStatus::Locked => {
                    Err(AuthError::CodeLocked)
                }
                Some(updated) => Err(AuthError::CodeInvalid {
                    attempts_remaining: updated.attempts_remaining(),
                }),
            };
        }

        // Correct code: claim the Pending → Verified transition. Losing the
        // compare-and-set means a concurrent attempt won and is
        // provisioning; this request's flow no longer exists.
        let won = self
            .codes
            .mark_verified(&record.email, record.attempt_count, now)
            .await?;
        if won {
            Ok(())
        } else {
            Err(AuthError::RegistrationNotFound)
        }
    }

    /// Remove the code record for an email, if any. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub async fn discard(&self, email: &str) -> Result<()> {
        self.codes.delete(email).await
    }
}
