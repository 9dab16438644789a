use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtHandler;
use crate::jwt::TokenError;
use crate::jwt::DEFAULT_TOKEN_TTL_HOURS;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator issuing tokens with the default seven-day lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Process-wide secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Override the lifetime of issued tokens.
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// The stateless hasher, for callers that move hashing onto a blocking thread.
    pub fn password_hasher(&self) -> PasswordHasher {
        self.password_hasher
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `EmptyPassword` - Plaintext is empty
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password attempt against a stored hash.
    ///
    /// # Errors
    /// * `CorruptCredential` - Stored hash cannot be parsed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identity the token asserts
    /// * `username` - Display name embedded in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: impl ToString,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(user_id, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, user_id: impl ToString, username: &str) -> Result<String, TokenError> {
        self.jwt_handler.issue(user_id, username, self.token_ttl)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature`, `Expired`, `Malformed` - see [`JwtHandler::validate_at`]
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.jwt_handler.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "user123", "alice")
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.username, "alice");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123", "alice");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let result = authenticator.authenticate("my_password", "not-a-phc-string", "u", "alice");
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::CorruptCredential(_)
            ))
        ));
    }

    #[test]
    fn test_custom_token_ttl() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!")
            .with_token_ttl(Duration::hours(1));

        let token = authenticator.issue_token("user123", "alice").unwrap();
        let claims = authenticator.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_rotated_secret_rejects_old_tokens() {
        let before = Authenticator::new(b"test_secret_key_at_least_32_bytes!");
        let after = Authenticator::new(b"rotated_secret_key_at_least_32_bytes");

        let token = before.issue_token("user123", "alice").unwrap();

        assert_eq!(
            after.validate_token(&token),
            Err(TokenError::InvalidSignature)
        );
    }
}
