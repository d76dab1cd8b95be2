//! # Family Ledger Authentication
//!
//! Email-verified account registration and sign-in for the Family Ledger
//! application.
//!
//! The heart of this crate is the **registration verification saga**: the
//! multi-step, multi-store workflow that takes a registrant from submitted
//! credentials to a fully provisioned, logged-in identity, using a one-time
//! numeric code delivered by email as proof of address ownership. The saga
//! coordinates a temporary registration record, a verification code with
//! brute-force protection, an identity store, a profile store, and a
//! session issuer - five independently-failing resources with no
//! cross-resource transaction - while enforcing expiry, attempt limiting,
//! resend cooldown, and idempotent cleanup.
//!
//! ## Architecture
//!
//! External collaborators sit behind provider traits and are injected
//! through an environment, so the saga logic runs at memory speed in tests:
//!
//! ```text
//! register ──► RegistrationRequest + VerificationCode ──► email with code
//! verify_code ──► code engine ──► identity ──► profile ──► session
//! ```
//!
//! ## Example
//!
//! ```
//! use family_ledger_auth::mocks::*;
//! use family_ledger_auth::{AuthConfig, AuthEnvironment, RegistrationSaga};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), family_ledger_auth::AuthError> {
//! let email_gateway = MockEmailProvider::new();
//! let env = AuthEnvironment::new(
//!     MockRegistrationStore::new(),
//!     MockVerificationCodeStore::new(),
//!     MockIdentityStore::new(),
//!     MockProfileStore::new(),
//!     MockSessionIssuer::new(),
//!     email_gateway.clone(),
//!     Arc::new(TestClock::default()),
//! );
//! let saga = RegistrationSaga::new(AuthConfig::new(vec![7u8; 32]), env)?;
//!
//! saga.register("ann@example.com", "Ann", "P@ssw0rd1").await?;
//! let code = email_gateway.last_code_for("ann@example.com").unwrap();
//! let provisioned = saga.verify_code("ann@example.com", &code).await?;
//! assert_eq!(provisioned.user.email, "ann@example.com");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod cooldown;
pub mod credential;
pub mod engine;
pub mod environment;
pub mod error;
pub mod hash;
pub mod providers;
pub mod saga;
pub mod state;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::AuthConfig;
pub use environment::{AuthEnvironment, Clock, SystemClock};
pub use error::{AuthError, Result};
pub use saga::{Authenticated, CodeResent, Provisioned, Registered, RegistrationSaga};
pub use state::{CodeStatus, RegistrationRequest, Session, UserId, VerificationCode};
