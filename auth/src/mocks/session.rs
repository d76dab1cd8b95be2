//! Mock session issuer for testing.

use crate::error::{AuthError, Result};
use crate::providers::SessionIssuer;
use crate::state::Session;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::RngCore;
use std::future::Future;

/// Mock session issuer.
///
/// Issues random token pairs without any backing store. Can be
/// constructed failing so tests can exercise the "account created, sign in
/// manually" path.
#[derive(Debug, Clone)]
pub struct MockSessionIssuer {
    should_succeed: bool,
}

impl MockSessionIssuer {
    /// Create a mock issuer that succeeds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            should_succeed: true,
        }
    }

    /// Create a mock issuer that always fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            should_succeed: false,
        }
    }
}

impl Default for MockSessionIssuer {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionIssuer for MockSessionIssuer {
    fn issue_session(
        &self,
        _email: &str,
        _password: &str,
    ) -> impl Future<Output = Result<Session>> + Send {
        let should_succeed = self.should_succeed;

        async move {
            if !should_succeed {
                return Err(AuthError::StorageError(
                    "simulated session issuer failure".to_string(),
                ));
            }

            let ttl = Duration::hours(1);
            Ok(Session {
                access_token: random_token(),
                refresh_token: random_token(),
                expires_in: ttl.num_seconds(),
                expires_at: Utc::now() + ttl,
            })
        }
    }
}
