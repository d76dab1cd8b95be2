//! Registration and sign-in configuration.
//!
//! All limits and windows live in an explicit configuration struct passed to
//! the saga at construction. There are no ambient globals; defaults mirror
//! the product constants (6-digit codes, 5-minute code window, 30-minute
//! registration window, 5 attempts, 60-second resend cooldown).

use chrono::Duration;

/// Registration saga configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Number of digits in a verification code.
    ///
    /// Default: 6
    pub code_length: u32,

    /// Verification code time-to-live.
    ///
    /// Default: 5 minutes
    pub code_ttl: Duration,

    /// Pending registration time-to-live.
    ///
    /// Default: 30 minutes
    pub registration_ttl: Duration,

    /// Maximum wrong guesses before a code locks.
    ///
    /// Default: 5
    pub max_attempts: u32,

    /// Minimum interval between code resends for one email.
    ///
    /// Default: 60 seconds
    pub resend_cooldown: Duration,

    /// 32-byte AES-256-GCM key sealing pending credentials at rest.
    ///
    /// Must come from a secret source (not hardcoded, not logged).
    pub sealing_key: Vec<u8>,
}

impl AuthConfig {
    /// Create a configuration with product defaults.
    ///
    /// # Arguments
    ///
    /// * `sealing_key` - 32-byte AES-256 key for sealing pending credentials
    #[must_use]
    pub const fn new(sealing_key: Vec<u8>) -> Self {
        Self {
            code_length: 6,
            code_ttl: Duration::minutes(5),
            registration_ttl: Duration::minutes(30),
            max_attempts: 5,
            resend_cooldown: Duration::seconds(60),
            sealing_key,
        }
    }

    /// Set the verification code time-to-live.
    #[must_use]
    pub const fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    /// Set the pending registration time-to-live.
    #[must_use]
    pub const fn with_registration_ttl(mut self, ttl: Duration) -> Self {
        self.registration_ttl = ttl;
        self
    }

    /// Set the maximum wrong guesses before a code locks.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the resend cooldown.
    #[must_use]
    pub const fn with_resend_cooldown(mut self, cooldown: Duration) -> Self {
        self.resend_cooldown = cooldown;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_constants() {
        let config = AuthConfig::new(vec![0u8; 32]);
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_ttl, Duration::minutes(5));
        assert_eq!(config.registration_ttl, Duration::minutes(30));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.resend_cooldown, Duration::seconds(60));
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = AuthConfig::new(vec![0u8; 32])
            .with_code_ttl(Duration::minutes(10))
            .with_max_attempts(3)
            .with_resend_cooldown(Duration::seconds(30));
        assert_eq!(config.code_ttl, Duration::minutes(10));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.resend_cooldown, Duration::seconds(30));
    }
}
