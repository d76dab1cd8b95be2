//! Integration tests for the registration verification saga.
//!
//! Every test drives the full saga against in-memory mock providers and a
//! frozen [`TestClock`], so expiry windows and cooldowns are simulated by
//! advancing time rather than sleeping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use chrono::Duration;
use family_ledger_auth::mocks::{
    MockEmailProvider, MockIdentityStore, MockProfileStore, MockRegistrationStore,
    MockSessionIssuer, MockVerificationCodeStore, TestClock,
};
use family_ledger_auth::providers::{IdentityStore, ProfileStore};
use family_ledger_auth::{AuthConfig, AuthEnvironment, AuthError, Clock, RegistrationSaga};
use std::sync::Arc;

const EMAIL: &str = "user@example.com";
const NAME: &str = "Test User";
const PASSWORD: &str = "Sup3rSecret";

type TestSaga = RegistrationSaga<
    MockRegistrationStore,
    MockVerificationCodeStore,
    MockIdentityStore,
    MockProfileStore,
    MockSessionIssuer,
    MockEmailProvider,
>;

/// Saga wired to mock providers, with handles kept for inspection.
struct Harness {
    saga: TestSaga,
    registrations: MockRegistrationStore,
    codes: MockVerificationCodeStore,
    identities: MockIdentityStore,
    profiles: MockProfileStore,
    email: MockEmailProvider,
    clock: Arc<TestClock>,
}

impl Harness {
    fn build(
        codes: MockVerificationCodeStore,
        profiles: MockProfileStore,
        sessions: MockSessionIssuer,
        email: MockEmailProvider,
    ) -> Self {
        let registrations = MockRegistrationStore::new();
        let identities = MockIdentityStore::new();
        let clock = Arc::new(TestClock::default());
        let env = AuthEnvironment::new(
            registrations.clone(),
            codes.clone(),
            identities.clone(),
            profiles.clone(),
            sessions,
            email.clone(),
            clock.clone(),
        );
        let saga = RegistrationSaga::new(AuthConfig::new(vec![0x42; 32]), env).unwrap();
        Self {
            saga,
            registrations,
            codes,
            identities,
            profiles,
            email,
            clock,
        }
    }

    fn new() -> Self {
        Self::build(
            MockVerificationCodeStore::new(),
            MockProfileStore::new(),
            MockSessionIssuer::new(),
            MockEmailProvider::new(),
        )
    }

    /// The code most recently emailed to [`EMAIL`].
    fn last_code(&self) -> String {
        self.email.last_code_for(EMAIL).unwrap()
    }

    fn clock_now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

/// A valid six-digit code that differs from `code`.
fn wrong_code(code: &str) -> String {
    if code.starts_with('0') {
        format!("1{}", &code[1..])
    } else {
        format!("0{}", &code[1..])
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Happy path
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn register_then_verify_provisions_identity_profile_and_session() {
    let h = Harness::new();

    let registered = h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    assert_eq!(registered.email, EMAIL);
    assert_eq!(h.email.sent_count(), 1);

    let provisioned = h.saga.verify_code(EMAIL, &h.last_code()).await.unwrap();
    assert_eq!(provisioned.user.email, EMAIL);
    assert_eq!(provisioned.user.name.as_deref(), Some(NAME));
    assert!(provisioned.user.email_verified);
    assert!(provisioned.session.is_some());

    // The profile exists and the identity is live.
    let profile = h
        .profiles
        .get_profile(provisioned.user.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.name, NAME);
    assert!(h.identities.email_exists(EMAIL).await.unwrap());

    // Both temporary records are gone.
    assert!(h.registrations.is_empty());
    assert!(h.codes.is_empty());
}

#[tokio::test]
async fn verified_email_cannot_register_again() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    h.saga.verify_code(EMAIL, &h.last_code()).await.unwrap();

    let error = h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap_err();
    assert!(matches!(error, AuthError::EmailAlreadyRegistered));
}

#[tokio::test]
async fn email_is_normalized_before_every_lookup() {
    let h = Harness::new();

    h.saga
        .register("  User@Example.COM ", NAME, PASSWORD)
        .await
        .unwrap();
    let code = h.last_code();

    let provisioned = h.saga.verify_code("USER@example.com", &code).await.unwrap();
    assert_eq!(provisioned.user.email, EMAIL);
}

#[tokio::test]
async fn login_after_provisioning() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    h.saga.verify_code(EMAIL, &h.last_code()).await.unwrap();

    let authenticated = h.saga.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(authenticated.user.email, EMAIL);
    assert!(!authenticated.session.access_token.is_empty());

    let error = h.saga.login(EMAIL, "Wr0ngPassword").await.unwrap_err();
    assert!(matches!(error, AuthError::InvalidCredentials));
}

// ═══════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn register_rejects_malformed_input() {
    let h = Harness::new();

    let error = h
        .saga
        .register("not-an-email", NAME, PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::Validation { field: "email", .. }));

    let error = h.saga.register(EMAIL, "", PASSWORD).await.unwrap_err();
    assert!(matches!(error, AuthError::Validation { field: "name", .. }));

    let error = h.saga.register(EMAIL, NAME, "short").await.unwrap_err();
    assert!(matches!(
        error,
        AuthError::Validation {
            field: "password",
            ..
        }
    ));

    // Nothing was written for any of the rejected attempts.
    assert!(h.registrations.is_empty());
    assert!(h.codes.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Re-registration supersedes
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn second_register_replaces_the_first_attempt() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let first_code = h.last_code();

    h.clock.advance(Duration::minutes(2));
    h.saga.register(EMAIL, "Renamed User", PASSWORD).await.unwrap();
    let second_code = h.last_code();

    // Exactly one registration/code pair survives.
    assert_eq!(h.registrations.len(), 1);
    assert_eq!(h.codes.len(), 1);

    // The first code no longer verifies; the second provisions under the
    // superseding attempt's name.
    if first_code != second_code {
        let error = h.saga.verify_code(EMAIL, &first_code).await.unwrap_err();
        assert!(matches!(error, AuthError::CodeInvalid { .. }));
    }
    let provisioned = h.saga.verify_code(EMAIL, &second_code).await.unwrap();
    assert_eq!(provisioned.user.name.as_deref(), Some("Renamed User"));
}

// ═══════════════════════════════════════════════════════════════════════
// Attempt limiting
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn wrong_code_counts_down_then_locks() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let code = h.last_code();
    let bad = wrong_code(&code);

    for expected_remaining in [4, 3, 2, 1] {
        let error = h.saga.verify_code(EMAIL, &bad).await.unwrap_err();
        match error {
            AuthError::CodeInvalid { attempts_remaining } => {
                assert_eq!(attempts_remaining, expected_remaining);
            }
            other => panic!("expected CodeInvalid, got {other:?}"),
        }
    }

    // The fifth failure exhausts the budget.
    let error = h.saga.verify_code(EMAIL, &bad).await.unwrap_err();
    assert!(matches!(error, AuthError::CodeLocked));

    // Even the correct code is refused once locked.
    let error = h.saga.verify_code(EMAIL, &code).await.unwrap_err();
    assert!(matches!(error, AuthError::CodeLocked));
    assert!(!h.identities.email_exists(EMAIL).await.unwrap());
}

#[tokio::test]
async fn resend_resets_the_attempt_budget() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let bad = wrong_code(&h.last_code());
    for _ in 0..3 {
        let _ = h.saga.verify_code(EMAIL, &bad).await.unwrap_err();
    }

    h.clock.advance(Duration::seconds(61));
    h.saga.resend(EMAIL).await.unwrap();

    let bad = wrong_code(&h.last_code());
    let error = h.saga.verify_code(EMAIL, &bad).await.unwrap_err();
    match error {
        AuthError::CodeInvalid { attempts_remaining } => assert_eq!(attempts_remaining, 4),
        other => panic!("expected CodeInvalid, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Expiry windows
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn expired_code_is_rejected_and_both_records_cleaned_up() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let code = h.last_code();

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let error = h.saga.verify_code(EMAIL, &code).await.unwrap_err();
    assert!(matches!(error, AuthError::CodeExpired));
    assert!(h.registrations.is_empty());
    assert!(h.codes.is_empty());

    // A repeat attempt finds nothing pending.
    let error = h.saga.verify_code(EMAIL, &code).await.unwrap_err();
    assert!(matches!(error, AuthError::RegistrationNotFound));
}

#[tokio::test]
async fn registration_expiry_wins_over_a_still_fresh_code() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();

    // A resend at minute 28 leaves the code fresh at minute 31, but the
    // registration window has closed by then.
    h.clock.advance(Duration::minutes(28));
    h.saga.resend(EMAIL).await.unwrap();
    h.clock.advance(Duration::minutes(3));

    let code = h.last_code();
    let error = h.saga.verify_code(EMAIL, &code).await.unwrap_err();
    assert!(matches!(error, AuthError::RegistrationExpired));
    assert!(h.registrations.is_empty());
    assert!(h.codes.is_empty());
}

#[tokio::test]
async fn verify_without_a_pending_registration_reports_not_found() {
    let h = Harness::new();

    let error = h.saga.verify_code(EMAIL, "123456").await.unwrap_err();
    assert!(matches!(error, AuthError::RegistrationNotFound));
}

// ═══════════════════════════════════════════════════════════════════════
// Resend cooldown
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn resend_is_gated_by_the_cooldown() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();

    let error = h.saga.resend(EMAIL).await.unwrap_err();
    match error {
        AuthError::ResendCooldown { retry_after } => {
            assert_eq!(retry_after.as_secs(), 60);
        }
        other => panic!("expected ResendCooldown, got {other:?}"),
    }
    assert_eq!(h.email.sent_count(), 1);

    h.clock.advance(Duration::seconds(61));
    let resent = h.saga.resend(EMAIL).await.unwrap();
    assert_eq!(h.email.sent_count(), 2);
    assert_eq!(
        resent.can_resend_after,
        h.clock_now() + Duration::seconds(60)
    );
}

#[tokio::test]
async fn resend_invalidates_the_previous_code() {
    let h = Harness::new();

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let first_code = h.last_code();

    h.clock.advance(Duration::seconds(61));
    h.saga.resend(EMAIL).await.unwrap();
    let second_code = h.last_code();

    if first_code != second_code {
        let error = h.saga.verify_code(EMAIL, &first_code).await.unwrap_err();
        assert!(matches!(error, AuthError::CodeInvalid { .. }));
    }
    h.saga.verify_code(EMAIL, &second_code).await.unwrap();
}

#[tokio::test]
async fn resend_without_a_pending_code_reports_not_found() {
    let h = Harness::new();

    let error = h.saga.resend(EMAIL).await.unwrap_err();
    assert!(matches!(error, AuthError::RegistrationNotFound));
}

// ═══════════════════════════════════════════════════════════════════════
// Failure and compensation
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn code_write_failure_rolls_back_the_registration_record() {
    let h = Harness::build(
        MockVerificationCodeStore::failing_create(),
        MockProfileStore::new(),
        MockSessionIssuer::new(),
        MockEmailProvider::new(),
    );

    let error = h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap_err();
    assert!(matches!(error, AuthError::StorageError(_)));

    // The registration written before the failing code write was undone.
    assert!(h.registrations.is_empty());
    assert_eq!(h.email.sent_count(), 0);
}

#[tokio::test]
async fn email_delivery_failure_keeps_the_records_for_a_resend() {
    let h = Harness::build(
        MockVerificationCodeStore::new(),
        MockProfileStore::new(),
        MockSessionIssuer::new(),
        MockEmailProvider::failing(),
    );

    let error = h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap_err();
    assert!(matches!(error, AuthError::EmailDeliveryFailed));

    // Both records survive so the user can ask for another code.
    assert_eq!(h.registrations.len(), 1);
    assert_eq!(h.codes.len(), 1);
}

#[tokio::test]
async fn profile_failure_unwinds_the_created_identity() {
    let h = Harness::build(
        MockVerificationCodeStore::new(),
        MockProfileStore::failing(),
        MockSessionIssuer::new(),
        MockEmailProvider::new(),
    );

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let error = h.saga.verify_code(EMAIL, &h.last_code()).await.unwrap_err();
    assert!(error.is_server_error());

    // The compensating delete removed the half-provisioned identity.
    assert!(!h.identities.email_exists(EMAIL).await.unwrap());
}

#[tokio::test]
async fn session_failure_still_reports_the_provisioned_account() {
    let h = Harness::build(
        MockVerificationCodeStore::new(),
        MockProfileStore::new(),
        MockSessionIssuer::failing(),
        MockEmailProvider::new(),
    );

    h.saga.register(EMAIL, NAME, PASSWORD).await.unwrap();
    let provisioned = h.saga.verify_code(EMAIL, &h.last_code()).await.unwrap();

    // The account is durable even though no tokens could be minted.
    assert!(provisioned.session.is_none());
    assert!(h.identities.email_exists(EMAIL).await.unwrap());
    assert!(h.registrations.is_empty());
    assert!(h.codes.is_empty());
}
