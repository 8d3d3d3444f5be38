//! Connection authentication.
//!
//! Clients present an opaque bearer token in the upgrade request's query
//! string. Verification happens once, before any connection state exists;
//! a bad token closes the socket without registering anything.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
}

/// Validates a presented token and yields the user it identifies.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Process-default verifier: tokens are `"<secret>:<user-id>"`.
///
/// Stands in for a real credential scheme; anything implementing
/// [`TokenVerifier`] can replace it at assembly time.
pub struct SharedSecretVerifier {
    secret: String,
}

impl SharedSecretVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenVerifier for SharedSecretVerifier {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let (secret, user_id) = token.split_once(':').ok_or(AuthError::InvalidToken)?;
        if secret != self.secret || user_id.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(user_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token_yields_user() {
        let verifier = SharedSecretVerifier::new("hunter2");
        assert_eq!(verifier.verify("hunter2:alice"), Ok("alice".to_string()));
    }

    #[test]
    fn test_bad_secret_rejected() {
        let verifier = SharedSecretVerifier::new("hunter2");
        assert_eq!(verifier.verify("wrong:alice"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let verifier = SharedSecretVerifier::new("hunter2");
        assert_eq!(verifier.verify("hunter2"), Err(AuthError::InvalidToken));
        assert_eq!(verifier.verify("hunter2:"), Err(AuthError::InvalidToken));
    }
}
