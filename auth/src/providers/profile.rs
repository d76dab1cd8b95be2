//! Profile store trait.

use crate::error::Result;
use crate::providers::UserProfile;
use crate::state::UserId;

/// Application-level profile store (external collaborator).
pub trait ProfileStore: Send + Sync {
    /// Create the profile for a freshly provisioned identity.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails. The saga responds by
    /// deleting the identity again so no account persists without a
    /// profile.
    fn create_profile(
        &self,
        user_id: UserId,
        name: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fetch the profile for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the storage operation fails.
    fn get_profile(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>>> + Send;
}
