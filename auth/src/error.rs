//! Error types for registration and sign-in operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the registration and sign-in core.
///
/// Variants are split into caller-actionable outcomes (validation, conflict,
/// not-found, expiry, lockout, cooldown) and server-side failures (storage,
/// crypto, delivery). Caller-actionable variants are returned with a stable
/// machine-readable code and are never logged as incidents; server-side
/// variants are logged with context and returned opaquely.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════

    /// A request field failed predicate validation.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason the field was rejected.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Registration Flow
    // ═══════════════════════════════════════════════════════════

    /// A confirmed identity already exists for this email.
    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    /// No pending registration or verification code exists for this email.
    ///
    /// The caller should start over with a fresh registration.
    #[error("No pending registration for this email")]
    RegistrationNotFound,

    /// The 30-minute registration window elapsed before verification.
    #[error("Registration has expired, please register again")]
    RegistrationExpired,

    /// The verification code's own window elapsed.
    #[error("Verification code has expired")]
    CodeExpired,

    /// The submitted code did not match the issued one.
    #[error("Invalid verification code, {attempts_remaining} attempts remaining")]
    CodeInvalid {
        /// Attempts left before the code locks. Never negative.
        attempts_remaining: u32,
    },

    /// The attempt budget for this code is exhausted.
    ///
    /// Terminal for the code instance; only a resend issues a fresh one.
    #[error("Verification code is locked after too many failed attempts")]
    CodeLocked,

    /// Resend requested while the cooldown window is still open.
    #[error("Please wait {} seconds before requesting another code", .retry_after.as_secs())]
    ResendCooldown {
        /// Remaining wait before a resend is allowed.
        retry_after: std::time::Duration,
    },

    // ═══════════════════════════════════════════════════════════
    // Sign-In
    // ═══════════════════════════════════════════════════════════

    /// Invalid credentials provided.
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The email gateway reported a delivery failure.
    #[error("Failed to send verification email")]
    EmailDeliveryFailed,

    /// A backing store operation failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Internal error (crypto or invariant failure, not exposed to users).
    #[error("Internal error")]
    InternalError,
}

impl AuthError {
    /// Stable machine-readable error code for API consumers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use family_ledger_auth::AuthError;
    /// assert_eq!(AuthError::EmailAlreadyRegistered.code(), "EMAIL_EXISTS");
    /// assert_eq!(AuthError::CodeLocked.code(), "CODE_LOCKED");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::EmailAlreadyRegistered => "EMAIL_EXISTS",
            Self::RegistrationNotFound => "CODE_NOT_FOUND",
            Self::RegistrationExpired => "REGISTRATION_EXPIRED",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeInvalid { .. } => "CODE_INVALID",
            Self::CodeLocked => "CODE_LOCKED",
            Self::ResendCooldown { .. } => "RATE_LIMIT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailDeliveryFailed => "EMAIL_SEND_FAILED",
            Self::StorageError(_) | Self::InternalError => "SERVER_ERROR",
        }
    }

    /// Returns `true` if this error is a caller-actionable outcome.
    ///
    /// Caller-actionable outcomes are expected and are never logged as
    /// incidents.
    ///
    /// # Examples
    ///
    /// ```
    /// # use family_ledger_auth::AuthError;
    /// assert!(AuthError::CodeLocked.is_caller_error());
    /// assert!(!AuthError::InternalError.is_caller_error());
    /// ```
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Returns `true` if this error is an unexpected server-side failure.
    ///
    /// Server-side failures are logged with diagnostic context and returned
    /// to the caller without internal detail.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::EmailDeliveryFailed | Self::StorageError(_) | Self::InternalError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            AuthError::Validation {
                field: "email",
                reason: "bad".to_string()
            }
            .code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AuthError::RegistrationNotFound.code(), "CODE_NOT_FOUND");
        assert_eq!(AuthError::RegistrationExpired.code(), "REGISTRATION_EXPIRED");
        assert_eq!(AuthError::CodeExpired.code(), "CODE_EXPIRED");
        assert_eq!(
            AuthError::CodeInvalid {
                attempts_remaining: 3
            }
            .code(),
            "CODE_INVALID"
        );
        assert_eq!(
            AuthError::ResendCooldown {
                retry_after: std::time::Duration::from_secs(42)
            }
            .code(),
            "RATE_LIMIT"
        );
        assert_eq!(AuthError::StorageError(String::new()).code(), "SERVER_ERROR");
    }

    #[test]
    fn classification_splits_the_taxonomy() {
        assert!(AuthError::EmailAlreadyRegistered.is_caller_error());
        assert!(AuthError::InvalidCredentials.is_caller_error());
        assert!(AuthError::EmailDeliveryFailed.is_server_error());
        assert!(AuthError::StorageError("boom".to_string()).is_server_error());
        assert!(!AuthError::CodeLocked.is_server_error());
    }
}
