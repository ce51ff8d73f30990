//! Credential validation for mutating API calls.
//!
//! Two fixed configured values, checked per request. This guards fake,
//! session-scoped data only; it is not a real security boundary and must
//! not be reused as one.

use nimbus_core::config::AuthConfig;
use serde::Deserialize;

/// Credentials supplied with a mutating request.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Returns true when these credentials match the configured pair.
    pub fn verify(&self, config: &AuthConfig) -> bool {
        verify(&self.username, &self.password, config)
    }
}

/// Returns true when the supplied pair matches the configured values.
pub fn verify(username: &str, password: &str, config: &AuthConfig) -> bool {
    username == config.username && password == config.password
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            username: "user".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_matching_credentials_pass() {
        assert!(verify("user", "secret", &test_config()));
        let credentials = Credentials {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        assert!(credentials.verify(&test_config()));
    }

    #[test]
    fn test_wrong_password_fails() {
        assert!(!verify("user", "wrong", &test_config()));
    }

    #[test]
    fn test_wrong_username_fails() {
        assert!(!verify("intruder", "secret", &test_config()));
    }

    #[test]
    fn test_empty_credentials_fail() {
        assert!(!verify("", "", &test_config()));
    }
}
