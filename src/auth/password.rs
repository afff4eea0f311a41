//! Password strength policy and hashing.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Characters accepted as "special" by the strength policy.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 20;

/// Outcome of a password strength check.
///
/// Rules are checked independently so every violation is reported at once,
/// not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check a candidate password against the strength policy.
#[must_use]
pub fn validate(password: &str) -> ValidationResult {
    let mut errors = Vec::new();

    let length = password.chars().count();
    if length < MIN_LENGTH || length > MAX_LENGTH {
        errors.push("Password must be between 8 and 20 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        errors.push("Password must contain at least one special character".to_string());
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Hash a password with a per-hash random salt.
///
/// # Errors
/// Returns an error if the hasher rejects its input.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// An unparseable hash verifies as false rather than erroring; a corrupted
/// record must not let a login through.
#[must_use]
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_password_meeting_every_rule() {
        let result = validate("Abcd123!");

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn rejects_short_password_with_length_message_only() {
        let result = validate("Ab1!");

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Password must be between 8 and 20 characters".to_string()]
        );
    }

    #[test]
    fn rejects_overlong_password() {
        let result = validate("Abcdefgh123!Abcdefgh123!");

        assert!(!result.is_valid);
        assert!(result
            .errors
            .contains(&"Password must be between 8 and 20 characters".to_string()));
    }

    #[test]
    fn reports_each_missing_character_class() {
        let cases = [
            ("abcd123!", "Password must contain at least one uppercase letter"),
            ("ABCD123!", "Password must contain at least one lowercase letter"),
            ("Abcdefg!", "Password must contain at least one number"),
            ("Abcd1234", "Password must contain at least one special character"),
        ];

        for (password, expected) in cases {
            let result = validate(password);
            assert!(!result.is_valid, "{password} should fail");
            assert_eq!(result.errors, vec![expected.to_string()], "{password}");
        }
    }

    #[test]
    fn reports_all_violations_together() {
        let result = validate("abc");

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn hash_and_verify_round_trip() -> Result<()> {
        let hash = hash_password("Abcd123!")?;

        assert!(verify_password(&hash, "Abcd123!"));
        assert!(!verify_password(&hash, "Abcd123?"));

        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = hash_password("Abcd123!")?;
        let second = hash_password("Abcd123!")?;

        assert_ne!(first, second);

        Ok(())
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "Abcd123!"));
    }
}
