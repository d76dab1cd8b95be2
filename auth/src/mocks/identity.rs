//! Mock identity store for testing.

use crate::error::{AuthError, Result};
use crate::hash;
use crate::providers::{IdentityStore, User};
use crate::state::UserId;
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// One stored account: the user record plus the digest the store keeps of
/// the credential. The plaintext is hashed on the way in, as a real
/// identity provider would.
#[derive(Debug, Clone)]
struct StoredIdentity {
    user: User,
    password_digest: String,
}

/// Mock identity store.
///
/// Uses in-memory storage keyed by email.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityStore {
    identities: Arc<Mutex<HashMap<String, StoredIdentity>>>,
}

impl MockIdentityStore {
    /// Create a new mock identity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MockIdentityStore {
    fn email_exists(&self, email: &str) -> impl Future<Output = Result<bool>> + Send {
        let identities = Arc::clone(&self.identities);
        let email = email.to_string();

        async move {
            Ok(identities
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .contains_key(&email))
        }
    }

    fn create_identity(
        &self,
        email: &str,
        password: &str,
        pre_confirmed: bool,
    ) -> impl Future<Output = Result<UserId>> + Send {
        let identities = Arc::clone(&self.identities);
        let email = email.to_string();
        let password = password.to_string();

        async move {
            let mut guard = identities.lock().map_err(|_| AuthError::InternalError)?;
            if guard.contains_key(&email) {
                return Err(AuthError::EmailAlreadyRegistered);
            }

            let now = Utc::now();
            let user = User {
                user_id: UserId::new(),
                email: email.clone(),
                name: None,
                email_verified: pre_confirmed,
                created_at: now,
                updated_at: now,
            };
            let user_id = user.user_id;
            guard.insert(
                email,
                StoredIdentity {
                    user,
                    password_digest: hash::hash_secret(&password),
                },
            );
            Ok(user_id)
        }
    }

    fn delete_identity(&self, user_id: UserId) -> impl Future<Output = Result<()>> + Send {
        let identities = Arc::clone(&self.identities);

        async move {
            let mut guard = identities.lock().map_err(|_| AuthError::InternalError)?;
            guard.retain(|_, stored| stored.user.user_id != user_id);
            Ok(())
        }
    }

    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User>> + Send {
        let identities = Arc::clone(&self.identities);
        let email = email.to_string();
        let password = password.to_string();

        async move {
            let guard = identities.lock().map_err(|_| AuthError::InternalError)?;
            let Some(stored) = guard.get(&email) else {
                return Err(AuthError::InvalidCredentials);
            };
            if !hash::compare_secret(&password, &stored.password_digest) {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(stored.user.clone())
        }
    }
}
