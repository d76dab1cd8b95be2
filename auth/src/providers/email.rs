//! Email dispatch gateway trait.

use crate::error::Result;

/// Email dispatch gateway (external collaborator).
///
/// Delivers the verification code out-of-band. The saga treats delivery as
/// fire-and-fail-visible: a failure is surfaced as its own error class but
/// never rolls back the records already written, so the user may still
/// request a resend.
pub trait EmailProvider: Send + Sync {
    /// Send a verification code email.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address
    /// - `code`: Plaintext numeric code (never persisted, never logged)
    /// - `valid_minutes`: How long the code stays valid, for the template
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Email provider rejects the request
    fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        valid_minutes: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
