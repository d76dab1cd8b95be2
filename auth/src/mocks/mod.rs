//! Mock provider implementations for testing.
//!
//! Simple in-memory implementations of all provider traits, for unit and
//! integration tests. The code store honors the same conditional-update
//! contract as a real backend (its whole read-modify-write runs under one
//! lock), and the clock can be advanced to simulate elapsed windows
//! without sleeping.

pub mod clock;
pub mod code;
pub mod email;
pub mod identity;
pub mod profile;
pub mod registration;
pub mod session;

pub use clock::TestClock;
pub use code::MockVerificationCodeStore;
pub use email::{MockEmailProvider, SentEmail};
pub use identity::MockIdentityStore;
pub use profile::MockProfileStore;
pub use registration::MockRegistrationStore;
pub use session::MockSessionIssuer;
