//! Session issuer trait.

use crate::error::Result;
use crate::state::Session;

/// Exchanges verified credentials for an access/refresh token pair
/// (external collaborator).
///
/// Sessions are not persisted by this crate. Issuance failure after
/// provisioning is survivable: the account exists and the user can sign in
/// manually.
pub trait SessionIssuer: Send + Sync {
    /// Issue a session for a verified email/credential pair.
    ///
    /// # Errors
    ///
    /// Returns error if the issuer rejects the credentials or the request
    /// fails.
    fn issue_session(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Session>> + Send;
}
