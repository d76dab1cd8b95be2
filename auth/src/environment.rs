//! Saga environment.
//!
//! All external dependencies are abstracted behind traits and injected via
//! the environment, so the saga logic runs at memory speed in tests and
//! against real stores in production.

use crate::providers::{
    EmailProvider, IdentityStore, ProfileStore, RegistrationStore, SessionIssuer,
    VerificationCodeStore,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Clock trait - abstracts time operations for testability.
///
/// Expiry and cooldown decisions compare against `now()`, so tests inject a
/// controllable clock instead of sleeping through real windows.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Registration saga environment.
///
/// Contains every external collaborator the saga drives.
///
/// # Type Parameters
///
/// - `R`: Registration request store
/// - `C`: Verification code store
/// - `I`: Identity store
/// - `P`: Profile store
/// - `S`: Session issuer
/// - `E`: Email dispatch gateway
#[derive(Clone)]
pub struct AuthEnvironment<R, C, I, P, S, E>
where
    R: RegistrationStore + Clone,
    C: VerificationCodeStore + Clone,
    I: IdentityStore + Clone,
    P: ProfileStore + Clone,
    S: SessionIssuer + Clone,
    E: EmailProvider + Clone,
{
    /// Registration request store (temporary records, saga-owned).
    pub registrations: R,

    /// Verification code store (temporary records with atomic updates).
    pub codes: C,

    /// Identity store (durable accounts; hashes credentials itself).
    pub identities: I,

    /// Profile store (application metadata keyed 1:1 to identities).
    pub profiles: P,

    /// Session issuer (access/refresh token pairs).
    pub sessions: S,

    /// Email dispatch gateway (delivers codes out-of-band).
    pub email: E,

    /// Current-time provider.
    pub clock: Arc<dyn Clock>,
}

impl<R, C, I, P, S, E> AuthEnvironment<R, C, I, P, S, E>
where
    R: RegistrationStore + Clone,
    C: VerificationCodeStore + Clone,
    I: IdentityStore + Clone,
    P: ProfileStore + Clone,
    S: SessionIssuer + Clone,
    E: EmailProvider + Clone,
{
    /// Create a new environment from its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registrations: R,
        codes: C,
        identities: I,
        profiles: P,
        sessions: S,
        email: E,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registrations,
            codes,
            identities,
            profiles,
            sessions,
            email,
            clock,
        }
    }
}
