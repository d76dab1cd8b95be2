//! Saga collaborators.
//!
//! This module defines traits for every external dependency the saga
//! drives. Providers are **interfaces**, not implementations: the saga
//! depends on these traits, and the runtime wires in concrete stores.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: real services (PostgreSQL, Redis, an email API)
//! - **Development**: instrumented versions (logging, tracing)
//!
//! The two temporary-record stores ([`RegistrationStore`],
//! [`VerificationCodeStore`]) are saga-owned; the rest
//! ([`IdentityStore`], [`ProfileStore`], [`SessionIssuer`],
//! [`EmailProvider`]) are external systems specified only at their
//! interface boundary.

use crate::state::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod code;
pub mod console_email;
pub mod email;
pub mod identity;
pub mod profile;
pub mod registration;
pub mod session;

// Re-export provider traits
pub use code::VerificationCodeStore;
pub use console_email::ConsoleEmailProvider;
pub use email::EmailProvider;
pub use identity::IdentityStore;
pub use profile::ProfileStore;
pub use registration::RegistrationStore;
pub use session::SessionIssuer;

/// Durable account record in the identity store.
///
/// Created exactly once per successful verification. The identity store
/// hashes the credential itself; this crate never sees that hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub user_id: UserId,

    /// Email address (lowercased).
    pub email: String,

    /// Display name, if the store tracks one.
    pub name: Option<String>,

    /// Email verified flag. Always `true` for saga-provisioned accounts.
    pub email_verified: bool,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Application-level profile keyed 1:1 to a [`User`].
///
/// Invariant: an identity must never persist without its profile. When
/// profile creation fails mid-saga the identity is deleted again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owning user ID.
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// Profile created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}
