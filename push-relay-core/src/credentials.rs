//! Password verification and the activation state machine

use crate::config::RelayConfig;
use crate::crypto;
use crate::error::Error;
use crate::models::Account;
use crate::Result;

/// bcrypt only hashes the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Generate a one-time activation token for a new account
pub fn issue_activation_token(config: &RelayConfig) -> String {
    crypto::generate_token(config.activation_token_bytes)
}

/// Reject passwords that cannot be hashed faithfully
pub fn validate_password(raw_password: &str) -> Result<()> {
    if raw_password.is_empty() {
        return Err(Error::Validation("Password must not be empty".to_string()));
    }
    if raw_password.len() > MAX_PASSWORD_BYTES {
        return Err(Error::Validation(format!(
            "Password too long (maximum {} bytes)",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Decide whether `presented` activates `account`.
///
/// Stores call this while holding the account's lock and perform the
/// transition only on `Ok`. An active account has no live token, so every
/// later attempt is a `Mismatch`.
pub fn check_activation(account: &Account, presented: &str) -> Result<()> {
    if account.active {
        return Err(Error::Mismatch);
    }
    match &account.activation_token {
        Some(expected) if crypto::tokens_match(expected, presented) => Ok(()),
        _ => Err(Error::Mismatch),
    }
}

/// Check a raw password against the account's stored hash.
///
/// Input past [`MAX_PASSWORD_BYTES`] never matches, since bcrypt would
/// ignore the extra bytes.
pub fn verify_password(account: &Account, raw_password: &str) -> Result<bool> {
    if raw_password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    crypto::verify_password(raw_password, &account.password_hash)
        .map_err(|e| Error::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with_password(password: &str) -> Account {
        let hash = crypto::hash_password(password, 4).unwrap();
        Account::new("a@example.com".into(), hash, "the-token".into())
    }

    #[test]
    fn test_activation_accepts_exact_token() {
        let account = account_with_password("pw1");
        assert!(check_activation(&account, "the-token").is_ok());
    }

    #[test]
    fn test_activation_rejects_wrong_or_empty_token() {
        let account = account_with_password("pw1");
        assert!(matches!(check_activation(&account, "the-tokeN"), Err(Error::Mismatch)));
        assert!(matches!(check_activation(&account, ""), Err(Error::Mismatch)));
    }

    #[test]
    fn test_activation_rejects_active_account() {
        let mut account = account_with_password("pw1");
        account.active = true;
        assert!(matches!(check_activation(&account, "the-token"), Err(Error::Mismatch)));

        account.activation_token = None;
        assert!(matches!(check_activation(&account, "the-token"), Err(Error::Mismatch)));
    }

    #[test]
    fn test_verify_password_exact_match_only() {
        let account = account_with_password("hunter22");
        assert!(verify_password(&account, "hunter22").unwrap());

        for mutated in ["hunter23", "Hunter22", "hunter2", "hunter222", " hunter22"] {
            assert!(!verify_password(&account, mutated).unwrap(), "{mutated}");
        }
    }

    #[test]
    fn test_verify_password_rejects_bytes_past_bcrypt_limit() {
        let password = "p".repeat(MAX_PASSWORD_BYTES);
        let account = account_with_password(&password);

        assert!(verify_password(&account, &password).unwrap());
        assert!(!verify_password(&account, &format!("{password}X")).unwrap());
    }

    #[test]
    fn test_verify_password_malformed_hash_is_internal() {
        let account = Account::new("a@example.com".into(), "not-a-hash".into(), "t".into());
        assert!(matches!(verify_password(&account, "pw"), Err(Error::Internal(_))));
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("").is_err());
        assert!(validate_password("x").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_BYTES + 1)).is_err());
    }

    #[test]
    fn test_issued_tokens_follow_config() {
        let config = RelayConfig {
            activation_token_bytes: 48,
            ..RelayConfig::default()
        };
        assert_eq!(issue_activation_token(&config).len(), 64);
    }
}
