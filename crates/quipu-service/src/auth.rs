//! Shared-secret digest authentication.
//!
//! Regular callers are authorized by `SHA-512(account + login + salt)`;
//! the reserved admin login uses a time-based digest over the current
//! local hour stamp (`YYYYMMDDHH`) and the admin salt, so admin tokens
//! expire hourly. Tokens are compared in constant time.
//!
//! Failure is a boolean outcome, never an error: the dispatcher turns
//! it into a Forbidden response with no detail about which credential
//! component was wrong.

use chrono::Local;
use quipu_schema::MethodRequest;
use sha2::{Digest, Sha512};

/// Authentication secrets and the reserved admin identifier.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    salt: String,
    admin_salt: String,
    admin_login: String,
}

impl AuthConfig {
    /// Creates a configuration with explicit secrets.
    #[must_use]
    pub fn new(
        salt: impl Into<String>,
        admin_salt: impl Into<String>,
        admin_login: impl Into<String>,
    ) -> Self {
        Self {
            salt: salt.into(),
            admin_salt: admin_salt.into(),
            admin_login: admin_login.into(),
        }
    }

    /// Returns the user token salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the admin token salt.
    #[must_use]
    pub fn admin_salt(&self) -> &str {
        &self.admin_salt
    }

    /// Returns the reserved admin login.
    #[must_use]
    pub fn admin_login(&self) -> &str {
        &self.admin_login
    }

    /// Returns whether the envelope's caller is the admin identity.
    #[must_use]
    pub fn is_admin(&self, request: &MethodRequest) -> bool {
        request.login() == self.admin_login
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new("Otus", "42", "admin")
    }
}

/// Hex SHA-512 over the given input.
fn digest(input: &str) -> String {
    hex::encode(Sha512::digest(input.as_bytes()))
}

/// The expected token for an admin request at the given hour stamp.
fn admin_digest(config: &AuthConfig, hour_stamp: &str) -> String {
    digest(&format!("{}{}", hour_stamp, config.admin_salt))
}

/// The expected token for a regular request.
fn user_digest(config: &AuthConfig, account: &str, login: &str) -> String {
    digest(&format!("{}{}{}", account, login, config.salt))
}

/// Constant-time string equality.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Checks whether the envelope's token matches the expected digest.
#[must_use]
pub fn check_auth(config: &AuthConfig, request: &MethodRequest) -> bool {
    let expected = if config.is_admin(request) {
        let hour_stamp = Local::now().format("%Y%m%d%H").to_string();
        admin_digest(config, &hour_stamp)
    } else {
        user_digest(config, request.account(), request.login())
    };
    constant_time_eq(&expected, request.token())
}

/// Computes the valid token for an envelope at the current time.
///
/// Intended for tests and tooling; production callers receive tokens
/// out of band.
#[must_use]
pub fn valid_token(config: &AuthConfig, account: &str, login: &str) -> String {
    if login == config.admin_login {
        let hour_stamp = Local::now().format("%Y%m%d%H").to_string();
        admin_digest(config, &hour_stamp)
    } else {
        user_digest(config, account, login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quipu_schema::Schema;
    use serde_json::json;

    fn envelope(account: &str, login: &str, token: &str) -> MethodRequest {
        let args = json!({
            "account": account,
            "login": login,
            "token": token,
            "arguments": {},
            "method": "online_score",
        });
        MethodRequest::from_args(args.as_object().unwrap())
    }

    #[test]
    fn test_valid_user_token_is_accepted() {
        let config = AuthConfig::default();
        let token = valid_token(&config, "horns&hoofs", "h&f");
        assert!(check_auth(&config, &envelope("horns&hoofs", "h&f", &token)));
    }

    #[test]
    fn test_wrong_token_is_rejected() {
        let config = AuthConfig::default();
        assert!(!check_auth(
            &config,
            &envelope("horns&hoofs", "h&f", "invalid_token")
        ));
    }

    #[test]
    fn test_token_is_bound_to_account_and_login() {
        let config = AuthConfig::default();
        let token = valid_token(&config, "horns&hoofs", "h&f");
        assert!(!check_auth(&config, &envelope("other", "h&f", &token)));
        assert!(!check_auth(&config, &envelope("horns&hoofs", "other", &token)));
    }

    #[test]
    fn test_admin_token_uses_hour_stamp() {
        let config = AuthConfig::default();
        let token = valid_token(&config, "", "admin");
        assert!(check_auth(&config, &envelope("", "admin", &token)));

        let stale = admin_digest(&config, "1970010100");
        assert!(!check_auth(&config, &envelope("", "admin", &stale)));
    }

    #[test]
    fn test_absent_account_hashes_as_empty_string() {
        let config = AuthConfig::default();
        let token = valid_token(&config, "", "h&f");
        let args = json!({
            "login": "h&f",
            "token": token,
            "arguments": {},
            "method": "online_score",
        });
        let request = MethodRequest::from_args(args.as_object().unwrap());
        assert!(check_auth(&config, &request));
    }

    #[test]
    fn test_digest_is_sha512_hex() {
        let config = AuthConfig::default();
        let token = valid_token(&config, "a", "b");
        assert_eq!(token.len(), 128);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
    }
}
