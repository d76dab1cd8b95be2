//! Resend cooldown controller.
//!
//! Rate-limits how often a fresh verification code may be issued for one
//! email. There is no separate counter store: the cooldown derives entirely
//! from the live code's creation timestamp plus a fixed window.

use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};

/// Check whether a resend is allowed at `now`.
///
/// # Errors
///
/// Returns [`AuthError::ResendCooldown`] with the remaining wait when the
/// previous code was issued less than `cooldown` ago.
pub fn check_resend(
    last_issued_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<()> {
    let elapsed = now - last_issued_at;
    if elapsed < cooldown {
        let retry_after = (cooldown - elapsed).to_std().unwrap_or_default();
        return Err(AuthError::ResendCooldown { retry_after });
    }
    Ok(())
}

/// Earliest instant a subsequent resend will be accepted for a code issued
/// at `issued_at`.
#[must_use]
pub fn next_resend_at(issued_at: DateTime<Utc>, cooldown: Duration) -> DateTime<Utc> {
    issued_at + cooldown
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::seconds(60);

    #[test]
    fn denied_inside_the_window_with_positive_wait() {
        let issued = Utc::now();
        let err = check_resend(issued, issued + Duration::seconds(10), COOLDOWN);
        match err {
            Err(AuthError::ResendCooldown { retry_after }) => {
                assert_eq!(retry_after.as_secs(), 50);
            }
            other => panic!("expected cooldown denial, got {other:?}"),
        }
    }

    #[test]
    fn allowed_at_and_after_the_boundary() {
        let issued = Utc::now();
        assert!(check_resend(issued, issued + COOLDOWN, COOLDOWN).is_ok());
        assert!(check_resend(issued, issued + Duration::seconds(61), COOLDOWN).is_ok());
    }

    #[test]
    fn clock_skew_never_yields_negative_wait() {
        // A code stamped slightly in the future still reports a bounded wait.
        let issued = Utc::now();
        let result = check_resend(issued + Duration::seconds(5), issued, COOLDOWN);
        match result {
            Err(AuthError::ResendCooldown { retry_after }) => {
                assert!(retry_after.as_secs() <= 65);
            }
            other => panic!("expected cooldown denial, got {other:?}"),
        }
    }

    #[test]
    fn next_resend_is_issue_plus_cooldown() {
        let issued = Utc::now();
        assert_eq!(next_resend_at(issued, COOLDOWN), issued + COOLDOWN);
    }
}
