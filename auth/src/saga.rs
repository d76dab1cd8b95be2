//! Identity provisioning saga.
//!
//! The coordinator that takes a registrant from submitted credentials to a
//! fully provisioned, logged-in identity:
//!
//! ```text
//! register ──► RegistrationRequest + VerificationCode ──► email with code
//! verify_code ──► code engine ──► identity ──► profile ──► session
//! resend ──► cooldown gate ──► replacement code ──► email
//! login ──► identity store authenticate ──► session
//! ```
//!
//! The state it coordinates lives in several independently-failing stores
//! with no cross-resource transaction, so each forward step that succeeds
//! registers a compensating action; on a later failure the accumulated
//! undos run in reverse, best-effort, restoring the pre-saga state well
//! enough for the user to retry. Compensation failures are logged and never
//! block the user-visible outcome.

use crate::config::AuthConfig;
use crate::cooldown;
use crate::credential::CredentialSealer;
use crate::engine::VerificationEngine;
use crate::environment::AuthEnvironment;
use crate::error::{AuthError, Result};
use crate::providers::{
    EmailProvider, IdentityStore, ProfileStore, RegistrationStore, SessionIssuer, User,
    VerificationCodeStore,
};
use crate::state::{RegistrationRequest, Session};
use crate::utils::{normalize_email, validate_registration};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

// ═══════════════════════════════════════════════════════════════════════
// Outcomes
// ═══════════════════════════════════════════════════════════════════════

/// Outcome of [`RegistrationSaga::register`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registered {
    /// Normalized email the code was sent to.
    pub email: String,

    /// When the issued code stops being accepted.
    pub code_expires_at: DateTime<Utc>,
}

/// Outcome of [`RegistrationSaga::verify_code`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provisioned {
    /// The freshly provisioned identity.
    pub user: User,

    /// Session tokens, or `None` when issuance failed after the account was
    /// durably created; the caller should direct the user to sign in
    /// manually. Account creation is never rolled back for this.
    pub session: Option<Session>,
}

/// Outcome of [`RegistrationSaga::resend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeResent {
    /// When the replacement code stops being accepted.
    pub code_expires_at: DateTime<Utc>,

    /// Earliest instant the next resend will be accepted.
    pub can_resend_after: DateTime<Utc>,
}

/// Outcome of [`RegistrationSaga::login`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Authenticated {
    /// The authenticated identity.
    pub user: User,

    /// Fresh session tokens.
    pub session: Session,
}

// ═══════════════════════════════════════════════════════════════════════
// Compensation
// ═══════════════════════════════════════════════════════════════════════

type UndoFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Ordered list of undo steps, accumulated as forward steps succeed.
///
/// Executed in reverse on failure. Each undo is idempotent and
/// best-effort: its own failure is logged and the unwind continues, so the
/// user-visible outcome never blocks on cleanup success.
struct Compensations {
    steps: Vec<(&'static str, UndoFuture)>,
}

impl Compensations {
    const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(&mut self, step: &'static str, undo: UndoFuture) {
        self.steps.push((step, undo));
    }

    async fn unwind(self) {
        for (step, undo) in self.steps.into_iter().rev() {
            if let Err(error) = undo.await {
                tracing::error!(step, error = %error, "compensating action failed, continuing");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Saga
// ═══════════════════════════════════════════════════════════════════════

/// The identity provisioning saga.
///
/// One instance serves all requests: every operation reads its state from
/// the backing stores, so there is no shared in-process mutable state and
/// the concurrency discipline lives entirely at the storage layer.
#[derive(Clone)]
pub struct RegistrationSaga<R, C, I, P, S, E>
where
    R: RegistrationStore + Clone + 'static,
    C: VerificationCodeStore + Clone + 'static,
    I: IdentityStore + Clone + 'static,
    P: ProfileStore + Clone + 'static,
    S: SessionIssuer + Clone + 'static,
    E: EmailProvider + Clone + 'static,
{
    config: AuthConfig,
    env: AuthEnvironment<R, C, I, P, S, E>,
    engine: VerificationEngine<C>,
    sealer: CredentialSealer,
}

impl<R, C, I, P, S, E> RegistrationSaga<R, C, I, P, S, E>
where
    R: RegistrationStore + Clone + 'static,
    C: VerificationCodeStore + Clone + 'static,
    I: IdentityStore + Clone + 'static,
    P: ProfileStore + Clone + 'static,
    S: SessionIssuer + Clone + 'static,
    E: EmailProvider + Clone + 'static,
{
    /// Build a saga from its configuration and environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] when the configured credential
    /// sealing key is not a valid AES-256 key.
    pub fn new(config: AuthConfig, env: AuthEnvironment<R, C, I, P, S, E>) -> Result<Self> {
        let sealer = CredentialSealer::new(&config.sealing_key)?;
        let engine = VerificationEngine::new(
            env.codes.clone(),
            std::sync::Arc::clone(&env.clock),
            &config,
        );
        Ok(Self {
            config,
            env,
            engine,
            sealer,
        })
    }

    /// Start a registration: record the request, issue a code, email it.
    ///
    /// A prior in-flight registration for the same email is superseded
    /// (both temporary records deleted) rather than duplicated. The two
    /// record writes are independent; when the code write fails the fresh
    /// registration record is deleted again so nothing orphaned survives.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] - malformed email, name, or password
    /// - [`AuthError::EmailAlreadyRegistered`] - a confirmed identity
    ///   already exists for this email
    /// - [`AuthError::EmailDeliveryFailed`] - the gateway rejected the
    ///   email; the records are kept so the user may resend
    /// - [`AuthError::StorageError`] / [`AuthError::InternalError`] -
    ///   server-side failures
    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<Registered> {
        let email = normalize_email(email);
        validate_registration(&email, name, password)?;

        if self.env.identities.email_exists(&email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        // Re-registration supersedes any stale attempt for this email.
        self.engine.discard(&email).await?;
        self.env.registrations.delete(&email).await?;

        let now = self.env.clock.now();
        let request = RegistrationRequest {
            email: email.clone(),
            name: name.trim().to_string(),
            credential: self.sealer.seal(password)?,
            created_at: now,
            expires_at: now + self.config.registration_ttl,
        };
        self.env.registrations.create(&request).await?;

        let issued = match self.engine.issue(&email).await {
            Ok(issued) => issued,
            Err(error) => {
                // The second write failed; take the first back out so no
                // orphaned registration survives.
                if let Err(undo_error) = self.env.registrations.delete(&email).await {
                    tracing::error!(
                        %email,
                        error = %undo_error,
                        "failed to clean up registration after code write failure"
                    );
                }
                return Err(error);
            }
        };

        if let Err(error) = self
            .env
            .email
            .send_verification_code(&email, &issued.code, self.config.code_ttl.num_minutes())
            .await
        {
            // Delivery failure does not roll back the records: the user can
            // still ask for a resend.
            tracing::warn!(%email, error = %error, "verification email delivery failed");
            return Err(AuthError::EmailDeliveryFailed);
        }

        tracing::info!(%email, "registration started, verification code issued");
        Ok(Registered {
            email,
            code_expires_at: issued.expires_at,
        })
    }

    /// Verify a code and provision the identity, profile, and session.
    ///
    /// The registration window (30 minutes) is evaluated before the code's
    /// own window; an expired registration fails as expired regardless of
    /// the code's state, and both temporary records are cleaned up.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RegistrationNotFound`] - no pending registration or
    ///   code for this email; the caller should register again
    /// - [`AuthError::RegistrationExpired`] - the 30-minute window elapsed
    /// - [`AuthError::CodeExpired`] - the code's 5-minute window elapsed
    /// - [`AuthError::CodeInvalid`] - wrong code, with remaining attempts
    /// - [`AuthError::CodeLocked`] - attempt budget exhausted
    /// - [`AuthError::EmailAlreadyRegistered`] - the identity uniqueness
    ///   race surfaced at creation time
    /// - [`AuthError::StorageError`] / [`AuthError::InternalError`] -
    ///   server-side failures, including a profile-creation failure after
    ///   which the just-created identity has been deleted again
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<Provisioned> {
        let email = normalize_email(email);

        let Some(registration) = self.env.registrations.get(&email).await? else {
            return Err(AuthError::RegistrationNotFound);
        };
        if self.env.codes.get(&email).await?.is_none() {
            return Err(AuthError::RegistrationNotFound);
        }

        let now = self.env.clock.now();
        if registration.is_expired(now) {
            self.cleanup_pending(&email).await;
            return Err(AuthError::RegistrationExpired);
        }

        match self.engine.verify(&email, code).await {
            Ok(()) => {}
            Err(AuthError::CodeExpired) => {
                // The engine already dropped the code record; the sibling
                // registration goes with it.
                self.cleanup_pending(&email).await;
                return Err(AuthError::CodeExpired);
            }
            Err(error) => return Err(error),
        }

        self.provision(&email, &registration).await
    }

    /// Provision identity, profile, and session for a verified email.
    async fn provision(
        &self,
        email: &str,
        registration: &RegistrationRequest,
    ) -> Result<Provisioned> {
        let password = self.sealer.open(&registration.credential)?;
        let mut compensations = Compensations::new();

        // Identity creation failing needs no compensation: nothing was
        // created. A duplicate here is the registration pre-check race
        // surfacing as a conflict.
        let user_id = match self
            .env
            .identities
            .create_identity(email, &password, true)
            .await
        {
            Ok(user_id) => user_id,
            Err(error) => {
                if error.is_server_error() {
                    tracing::error!(%email, error = %error, "identity creation failed");
                }
                return Err(error);
            }
        };
        {
            let identities = self.env.identities.clone();
            compensations.push(
                "delete identity",
                Box::pin(async move { identities.delete_identity(user_id).await }),
            );
        }

        if let Err(error) = self
            .env
            .profiles
            .create_profile(user_id, &registration.name)
            .await
        {
            // An identity must never persist without its profile; undo and
            // let the user retry registration from a clean slate.
            tracing::error!(%email, error = %error, "profile creation failed, rolling back identity");
            compensations.unwind().await;
            return Err(error);
        }

        // The durable outcome exists; from here on nothing is rolled back.
        drop(compensations);
        self.cleanup_pending(email).await;

        let now = self.env.clock.now();
        let user = User {
            user_id,
            email: email.to_string(),
            name: Some(registration.name.clone()),
            email_verified: true,
            created_at: now,
            updated_at: now,
        };

        let session = match self.env.sessions.issue_session(email, &password).await {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!(
                    %email,
                    error = %error,
                    "session issuance failed after provisioning, user must sign in manually"
                );
                None
            }
        };

        tracing::info!(%email, %user_id, "identity provisioned");
        Ok(Provisioned { user, session })
    }

    /// Issue a replacement code for an in-flight registration.
    ///
    /// Gated by the resend cooldown (60 seconds from the previous code's
    /// issue time). The replacement invalidates the previous code entirely:
    /// fresh value, fresh window, attempt count back to zero. The
    /// registration record is untouched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RegistrationNotFound`] - no live code for this email
    /// - [`AuthError::ResendCooldown`] - cooldown still open, with the
    ///   remaining wait
    /// - [`AuthError::EmailDeliveryFailed`] - the gateway rejected the
    ///   email; the replacement code stays live for another resend
    /// - [`AuthError::StorageError`] - server-side failure
    pub async fn resend(&self, email: &str) -> Result<CodeResent> {
        let email = normalize_email(email);

        let Some(existing) = self.env.codes.get(&email).await? else {
            return Err(AuthError::RegistrationNotFound);
        };

        let now = self.env.clock.now();
        cooldown::check_resend(existing.created_at, now, self.config.resend_cooldown)?;

        let issued = self.engine.issue(&email).await?;
        if let Err(error) = self
            .env
            .email
            .send_verification_code(&email, &issued.code, self.config.code_ttl.num_minutes())
            .await
        {
            tracing::warn!(%email, error = %error, "verification email delivery failed on resend");
            return Err(AuthError::EmailDeliveryFailed);
        }

        tracing::info!(%email, "verification code reissued");
        Ok(CodeResent {
            code_expires_at: issued.expires_at,
            can_resend_after: cooldown::next_resend_at(issued.issued_at, self.config.resend_cooldown),
        })
    }

    /// Sign in against the identity store. No code machinery involved.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] - the pair does not match a
    ///   confirmed identity
    /// - [`AuthError::StorageError`] - server-side failure
    pub async fn login(&self, email: &str, password: &str) -> Result<Authenticated> {
        let email = normalize_email(email);
        let user = self.env.identities.authenticate(&email, password).await?;
        let session = self.env.sessions.issue_session(&email, password).await?;
        Ok(Authenticated { user, session })
    }

    /// Delete both temporary records for an email. Best-effort: failures
    /// are logged, never propagated, and a later attempt may retry since
    /// deletes are idempotent.
    async fn cleanup_pending(&self, email: &str) {
        if let Err(error) = self.env.registrations.delete(email).await {
            tracing::warn!(%email, error = %error, "failed to delete registration record");
        }
        if let Err(error) = self.engine.discard(email).await {
            tracing::warn!(%email, error = %error, "failed to delete verification code record");
        }
    }
}
