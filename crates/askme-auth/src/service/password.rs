//! Password hashing

use askme_common::AskError;

use crate::model::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Check a new password against the length rules. bcrypt ignores bytes past 72.
pub fn validate_password(password: &str) -> Result<(), AskError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AskError::IllegalArgument(format!(
            "password must contain at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AskError::IllegalArgument(format!(
            "password must not exceed {} bytes",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(password, cost).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("correct horse", 4).unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(verify_password("correct horse", &hashed));
        assert!(!verify_password("wrong horse", &hashed));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_password_length_rules() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password(&"p".repeat(72)).is_ok());
        assert!(validate_password(&"p".repeat(73)).is_err());
    }

    proptest! {
        #[test]
        fn password_rules_follow_char_and_byte_limits(password in "\\PC{0,80}") {
            let chars = password.chars().count();
            let bytes = password.len();
            let expected = chars >= MIN_PASSWORD_LENGTH && bytes <= MAX_PASSWORD_LENGTH;
            prop_assert_eq!(validate_password(&password).is_ok(), expected);
        }
    }
}
