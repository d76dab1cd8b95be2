//! Verification code store trait.

use crate::error::Result;
use crate::state::VerificationCode;
use chrono::{DateTime, Utc};

/// Temporary storage for live verification codes with atomic updates.
///
/// The read-then-conditionally-write of `attempt_count`/`status` is the
/// critical section of the whole flow: two concurrent verify attempts for
/// one email must not both transition `Pending` → `Verified`, and attempt
/// increments must not be lost. Implementations therefore expose the two
/// mutations as conditional operations ([`mark_verified`] is a
/// compare-and-set, [`record_failed_attempt`] an atomic increment) rather
/// than a blind `update`. A plain read-then-write would be a lost-update
/// bug.
///
/// [`mark_verified`]: VerificationCodeStore::mark_verified
/// [`record_failed_attempt`]: VerificationCodeStore::record_failed_attempt
pub trait VerificationCodeStore: Send + Sync {
    /// Store a verification code, replacing any prior record for the same
    /// email. Replacement (not mutation) is how resend resets the attempt
    /// budget and the expiry window.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn create(
        &self,
        code: &VerificationCode,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fetch the verification code for an email, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn get(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<VerificationCode>>> + Send;

    /// Delete the verification code for an email. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn delete(&self, email: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Atomically increment the attempt count for a pending code, flipping
    /// the row to `Locked` when the count reaches `max_attempts`.
    ///
    /// Returns the record after the increment, or `None` when no record
    /// exists for the email (e.g. a concurrent cleanup won).
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn record_failed_attempt(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<VerificationCode>>> + Send;

    /// Compare-and-set `Pending` → `Verified`.
    ///
    /// Succeeds only when the row is still `Pending` with exactly
    /// `expected_attempts` recorded, which serializes concurrent correct
    /// guesses: one caller wins and provisions, the rest observe `false`.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn mark_verified(
        &self,
        email: &str,
        expected_attempts: u32,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
