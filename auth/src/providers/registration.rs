//! Registration request store trait.

use crate::error::Result;
use crate::state::RegistrationRequest;

/// Temporary storage for in-flight registrations.
///
/// Records are keyed by lowercased email; at most one lives per email.
/// The saga owns the full record lifecycle, so the store needs only
/// create, read, and delete.
pub trait RegistrationStore: Send + Sync {
    /// Store a registration request, replacing any prior record for the
    /// same email.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn create(
        &self,
        request: &RegistrationRequest,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fetch the registration request for an email, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails. Absence is `Ok(None)`,
    /// not an error; the saga decides how to report it.
    fn get(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<RegistrationRequest>>> + Send;

    /// Delete the registration request for an email.
    ///
    /// Idempotent: deleting a missing record succeeds. Used both for
    /// success cleanup and for compensation, so it must be safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn delete(&self, email: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
