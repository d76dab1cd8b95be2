//! Identity store trait.

use crate::error::Result;
use crate::providers::User;
use crate::state::UserId;

/// The durable identity store (external collaborator).
///
/// Owns account records and credential hashing. The saga hands it the
/// plaintext credential exactly once, at provisioning time, and otherwise
/// never compares credentials itself.
pub trait IdentityStore: Send + Sync {
    /// Check whether a confirmed identity exists for this email.
    ///
    /// Used as the registration pre-check. Racing registrations are
    /// acceptable here; the loser surfaces as a duplicate at
    /// [`create_identity`](IdentityStore::create_identity) time.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Create an identity with the given credential.
    ///
    /// `pre_confirmed` marks the email as already verified (the saga only
    /// provisions after code verification).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailAlreadyRegistered`] when an identity with
    /// this email already exists (the uniqueness race surfacing), or a
    /// storage error otherwise.
    ///
    /// [`AuthError::EmailAlreadyRegistered`]: crate::AuthError::EmailAlreadyRegistered
    fn create_identity(
        &self,
        email: &str,
        password: &str,
        pre_confirmed: bool,
    ) -> impl std::future::Future<Output = Result<UserId>> + Send;

    /// Delete an identity. Compensating action: best-effort, idempotent.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails; the saga logs such
    /// failures and never propagates them.
    fn delete_identity(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Authenticate an email/credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the pair does not
    /// match a confirmed identity, or a storage error otherwise.
    ///
    /// [`AuthError::InvalidCredentials`]: crate::AuthError::InvalidCredentials
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<User>> + Send;
}
