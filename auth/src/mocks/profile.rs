//! Mock profile store for testing.

use crate::error::{AuthError, Result};
use crate::providers::{ProfileStore, UserProfile};
use crate::state::UserId;
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock profile store.
///
/// Uses in-memory storage keyed by user id. Can be constructed failing so
/// tests can force the saga's identity rollback.
#[derive(Debug, Clone, Default)]
pub struct MockProfileStore {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    fail_create: bool,
}

impl MockProfileStore {
    /// Create a new mock profile store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose `create_profile` always fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
            fail_create: true,
        }
    }
}

impl ProfileStore for MockProfileStore {
    fn create_profile(
        &self,
        user_id: UserId,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        let profiles = Arc::clone(&self.profiles);
        let name = name.to_string();
        let fail = self.fail_create;

        async move {
            if fail {
                return Err(AuthError::StorageError(
                    "simulated profile store write failure".to_string(),
                ));
            }

            let now = Utc::now();
            profiles.lock().map_err(|_| AuthError::InternalError)?.insert(
                user_id,
                UserProfile {
                    user_id,
                    name,
                    created_at: now,
                    updated_at: now,
                },
            );
            Ok(())
        }
    }

    fn get_profile(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<UserProfile>>> + Send {
        let profiles = Arc::clone(&self.profiles);

        async move {
            Ok(profiles
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&user_id)
                .cloned())
        }
    }
}
