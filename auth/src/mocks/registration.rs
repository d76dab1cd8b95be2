//! Mock registration request store for testing.

use crate::error::{AuthError, Result};
use crate::providers::RegistrationStore;
use crate::state::RegistrationRequest;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock registration request store.
///
/// Uses in-memory storage keyed by email.
#[derive(Debug, Clone, Default)]
pub struct MockRegistrationStore {
    records: Arc<Mutex<HashMap<String, RegistrationRequest>>>,
}

impl MockRegistrationStore {
    /// Create a new mock registration store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records (test assertion helper).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RegistrationStore for MockRegistrationStore {
    fn create(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<()>> + Send {
        let records = Arc::clone(&self.records);
        let request = request.clone();

        async move {
            records
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .insert(request.email.clone(), request);
            Ok(())
        }
    }

    fn get(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<RegistrationRequest>>> + Send {
        let records = Arc::clone(&self.records);
        let email = email.to_string();

        async move {
            Ok(records
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&email)
                .cloned())
        }
    }

    fn delete(&self, email: &str) -> impl Future<Output = Result<()>> + Send {
        let records = Arc::clone(&self.records);
        let email = email.to_string();

        async move {
            records
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .remove(&email);
            Ok(())
        }
    }
}
