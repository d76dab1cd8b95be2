//! Input predicates and normalization.
//!
//! Stateless checks applied at the saga boundary. Emails are compared and
//! keyed lowercased; password rules mirror the product constants (8-20
//! characters with upper, lower, and digit classes).

use crate::error::{AuthError, Result};

/// Maximum accepted display-name length.
const NAME_MAX_LEN: usize = 50;

/// Normalize an email for keying: trim surrounding whitespace, lowercase.
///
/// # Examples
///
/// ```
/// use family_ledger_auth::utils::normalize_email;
///
/// assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
/// ```
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email address format.
///
/// Basic RFC 5322 shape: exactly one `@`, non-empty local and domain parts,
/// a dotted domain, and a sane length. Full compliance belongs to an edge
/// validator, not this core.
///
/// # Examples
///
/// ```
/// use family_ledger_auth::utils::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');
    if !local.chars().all(valid_local) || !domain.chars().all(valid_domain) {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}

/// Validate a registration request's fields.
///
/// # Errors
///
/// Returns [`AuthError::Validation`] naming the first offending field.
pub fn validate_registration(email: &str, name: &str, password: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(AuthError::Validation {
            field: "email",
            reason: "invalid email format".to_string(),
        });
    }

    let name = name.trim();
    if name.is_empty() || name.len() > NAME_MAX_LEN {
        return Err(AuthError::Validation {
            field: "name",
            reason: format!("name must be 1-{NAME_MAX_LEN} characters"),
        });
    }

    validate_password(password)
}

/// Validate password strength: 8-20 characters with at least one uppercase
/// letter, one lowercase letter, and one digit.
///
/// # Errors
///
/// Returns [`AuthError::Validation`] describing the failed rule.
pub fn validate_password(password: &str) -> Result<()> {
    let reason = if password.len() < 8 || password.len() > 20 {
        Some("password must be 8-20 characters")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("password must contain an uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("password must contain a lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("password must contain a digit")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(AuthError::Validation {
            field: "password",
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("A@B.Com"), "a@b.com");
        assert_eq!(normalize_email(" a@b.com\n"), "a@b.com");
    }

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@example.co.uk"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("P@ssw0rd1").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        assert!(validate_password(&"Aa1".repeat(10)).is_err()); // 30 chars
    }

    #[test]
    fn registration_validation_names_the_field() {
        let err = validate_registration("bad", "Ann", "P@ssw0rd1");
        assert!(matches!(
            err,
            Err(AuthError::Validation { field: "email", .. })
        ));
        let err = validate_registration("a@b.com", "", "P@ssw0rd1");
        assert!(matches!(
            err,
            Err(AuthError::Validation { field: "name", .. })
        ));
        let err = validate_registration("a@b.com", "Ann", "weak");
        assert!(matches!(
            err,
            Err(AuthError::Validation {
                field: "password",
                ..
            })
        ));
    }
}
