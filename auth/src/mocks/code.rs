//! Mock verification code store for testing.

use crate::error::{AuthError, Result};
use crate::providers::VerificationCodeStore;
use crate::state::{CodeStatus, VerificationCode};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock verification code store.
///
/// In-memory storage keyed by email. Every read-modify-write runs under
/// one lock, which gives the same serialization a real backend provides
/// with row-level conditional updates.
#[derive(Debug, Clone, Default)]
pub struct MockVerificationCodeStore {
    records: Arc<Mutex<HashMap<String, VerificationCode>>>,
    /// When `true`, `create` fails with a storage error (for exercising
    /// the saga's second-write compensation).
    fail_create: bool,
}

impl MockVerificationCodeStore {
    /// Create a new mock code store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose `create` always fails.
    #[must_use]
    pub fn failing_create() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            fail_create: true,
        }
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

impl VerificationCodeStore for MockVerificationCodeStore {
    fn create(&self, code: &VerificationCode) -> impl Future<Output = Result<()>> + Send {
        let records = Arc::clone(&self.records);
        let code = code.clone();
        let fail = self.fail_create;

        async move {
            if fail {
                return Err(AuthError::StorageError(
                    "simulated code store write failure".to_string(),
                ));
            }
            records
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .insert(code.email.clone(), code);
            Ok(())
        }
    }

    fn get(&self, email: &str) -> impl Future<Output = Result<Option<VerificationCode>>> + Send {
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

    fn record_failed_attempt(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<VerificationCode>>> + Send {
        let records = Arc::clone(&self.records);
        let email = email.to_string();

        async move {
            let mut guard = records.lock().map_err(|_| AuthError::InternalError)?;
            let Some(record) = guard.get_mut(&email) else {
                return Ok(None);
            };

            record.attempt_count += 1;
            if record.attempt_count >= record.max_attempts {
                record.status = CodeStatus::Locked;
            }
            Ok(Some(record.clone()))
        }
    }

    fn mark_verified(
        &self,
        email: &str,
        expected_attempts: u32,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send {
        let records = Arc::clone(&self.records);
        let email = email.to_string();

        async move {
            let mut guard = records.lock().map_err(|_| AuthError::InternalError)?;
            let Some(record) = guard.get_mut(&email) else {
                return Ok(false);
            };

            // Compare-and-set: the transition only goes through when the
            // row still looks exactly like the caller read it.
            if record.status != CodeStatus::Pending || record.attempt_count != expected_attempts {
                return Ok(false);
            }

            record.status = CodeStatus::Verified;
            record.verified_at = Some(at);
            Ok(true)
        }
    }
}
