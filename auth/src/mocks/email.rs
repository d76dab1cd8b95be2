//! Mock email provider for testing.

use crate::error::{AuthError, Result};
use crate::providers::EmailProvider;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// One captured outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,

    /// Plaintext verification code.
    pub code: String,

    /// Validity window stated in the email.
    pub valid_minutes: i64,
}

/// Mock email provider.
///
/// Captures outbound emails instead of sending them, so tests can read
/// back the generated code. Can be constructed failing to simulate a
/// gateway outage.
#[derive(Debug, Clone)]
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    should_succeed: bool,
}

impl MockEmailProvider {
    /// Create a mock provider that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a mock provider whose sends always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// The most recently sent code for an address, if any.
    #[must_use]
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .rev()
            .find(|sent| sent.to == email)
            .map(|sent| sent.code.clone())
    }

    /// Number of captured emails.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailProvider for MockEmailProvider {
    fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        valid_minutes: i64,
    ) -> impl Future<Output = Result<()>> + Send {
        let sent = Arc::clone(&self.sent);
        let email = SentEmail {
            to: to.to_string(),
            code: code.to_string(),
            valid_minutes,
        };
        let should_succeed = self.should_succeed;

        async move {
            if !should_succeed {
                return Err(AuthError::EmailDeliveryFailed);
            }
            sent.lock()
                .map_err(|_| AuthError::InternalError)?
                .push(email);
            Ok(())
        }
    }
}
