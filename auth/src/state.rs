//! Registration flow state types.
//!
//! The temporary records owned by the saga (`RegistrationRequest`,
//! `VerificationCode`) plus the session handed back after provisioning.
//! All types are `Clone` and `serde`-derived so stores may persist them in
//! whatever representation they choose.

use crate::credential::SealedCredential;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a provisioned user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Temporary Records
// ═══════════════════════════════════════════════════════════════════════

/// In-flight registration for one email.
///
/// At most one non-expired record exists per email. Created by register,
/// consumed and deleted on verification success, failure cleanup, or lazy
/// expiry detection; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Lowercased email address (unique key).
    pub email: String,

    /// Display name supplied by the registrant.
    pub name: String,

    /// Pending credential, sealed at rest. Never compared here.
    pub credential: SealedCredential,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp (creation + 30 minutes).
    pub expires_at: DateTime<Utc>,
}

impl RegistrationRequest {
    /// Whether the registration window has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Lifecycle status of a verification code.
///
/// `Pending` is the only non-terminal state: a wrong guess keeps the code
/// pending until the attempt budget runs out. `Verified`, `Locked`, and
/// `Expired` are terminal for the code instance; only a resend (which
/// replaces, never mutates, the record) escapes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    /// Awaiting a verify attempt.
    Pending,

    /// A matching code was submitted in time.
    Verified,

    /// Attempt budget exhausted.
    Locked,

    /// Code window elapsed.
    Expired,
}

/// One live verification code for one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Lowercased email address (key, shared with the registration record).
    pub email: String,

    /// Digest of the numeric code. The plaintext is never stored.
    pub code_digest: String,

    /// Wrong guesses so far. Never decreases.
    pub attempt_count: u32,

    /// Attempt budget; reaching it forces `Locked`.
    pub max_attempts: u32,

    /// Lifecycle status.
    pub status: CodeStatus,

    /// Creation timestamp. Also anchors the resend cooldown.
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp (creation + 5 minutes).
    pub expires_at: DateTime<Utc>,

    /// When the code was verified, if it was.
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
    /// Whether the code window has elapsed at `now`.
    ///
    /// Expiry is evaluated lazily at read time; the stored status may still
    /// say `Pending` when this returns `true`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Attempts left before the code locks. Saturates at zero.
    #[must_use]
    pub const fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempt_count)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Token pair issued after provisioning or sign-in.
///
/// Not persisted by this crate; the session issuer owns its durability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived access token.
    pub access_token: String,

    /// Longer-lived refresh token.
    pub refresh_token: String,

    /// Access token lifetime in seconds.
    pub expires_in: i64,

    /// Access token expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code_at(created: DateTime<Utc>, attempts: u32) -> VerificationCode {
        VerificationCode {
            email: "a@x.com".to_string(),
            code_digest: "digest".to_string(),
            attempt_count: attempts,
            max_attempts: 5,
            status: CodeStatus::Pending,
            created_at: created,
            expires_at: created + Duration::minutes(5),
            verified_at: None,
        }
    }

    #[test]
    fn expiry_is_inclusive_of_the_deadline() {
        let created = Utc::now();
        let code = code_at(created, 0);
        assert!(!code.is_expired(created + Duration::minutes(4)));
        assert!(code.is_expired(created + Duration::minutes(5)));
        assert!(code.is_expired(created + Duration::minutes(6)));
    }

    #[test]
    fn attempts_remaining_never_goes_negative() {
        let created = Utc::now();
        assert_eq!(code_at(created, 0).attempts_remaining(), 5);
        assert_eq!(code_at(created, 4).attempts_remaining(), 1);
        assert_eq!(code_at(created, 7).attempts_remaining(), 0);
    }
}
