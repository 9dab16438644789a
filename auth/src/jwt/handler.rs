use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Lifetime of an issued token. There is no refresh flow.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Issues and validates HS256-signed bearer tokens.
///
/// The secret is fixed at construction. Replacing it (building a new handler
/// with another secret) invalidates every token issued under the old one.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Issue a token for an identity, starting now.
    pub fn issue(
        &self,
        user_id: impl ToString,
        username: impl Into<String>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.issue_at(user_id, username, ttl, Utc::now())
    }

    /// Issue a token for an identity as of `now`.
    pub fn issue_at(
        &self,
        user_id: impl ToString,
        username: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.encode(&Claims::for_user(user_id, username, now, ttl))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Decode a token, verify its signature, and check it is unexpired at `now`.
    ///
    /// Pure: touches no storage and no shared mutable state.
    ///
    /// # Errors
    /// * `InvalidSignature` - Tampered, or signed under a different secret or algorithm
    /// * `Expired` - `now` is at or past the token's expiry
    /// * `Malformed` - Structure or claims cannot be decoded
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the caller's clock, with no leeway.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn ttl() -> Duration {
        Duration::hours(DEFAULT_TOKEN_TTL_HOURS)
    }

    #[test]
    fn test_issue_and_validate() {
        let handler = JwtHandler::new(SECRET);

        let token = handler.issue("user123", "alice", ttl()).unwrap();
        assert!(!token.is_empty());

        let claims = handler.validate(&token).expect("Failed to validate token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_valid_at_six_days_expired_at_eight() {
        let handler = JwtHandler::new(SECRET);
        let issued = Utc::now();

        let token = handler.issue_at("user123", "alice", ttl(), issued).unwrap();

        assert!(handler
            .validate_at(&token, issued + Duration::days(6))
            .is_ok());
        assert_eq!(
            handler.validate_at(&token, issued + Duration::days(8)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expired_exactly_at_expiry() {
        let handler = JwtHandler::new(SECRET);
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let token = handler.issue_at("user123", "alice", ttl(), issued).unwrap();

        assert!(handler
            .validate_at(&token, issued + ttl() - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            handler.validate_at(&token, issued + ttl()),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_flipped_signature_is_rejected() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue("user123", "alice", ttl()).unwrap();

        let (payload, signature) = token.rsplit_once('.').unwrap();
        let mut signature: Vec<char> = signature.chars().collect();
        signature[0] = if signature[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}", payload, signature.into_iter().collect::<String>());

        assert_eq!(
            handler.validate(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_claims_are_rejected() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue("user123", "alice", ttl()).unwrap();
        let forged = handler.issue("admin", "mallory", ttl()).unwrap();

        // Claims from one token, signature from another.
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert_eq!(
            handler.validate(&parts.join(".")),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = handler1.issue("user123", "alice", ttl()).unwrap();

        assert_eq!(
            handler2.validate(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_validate_malformed_token() {
        let handler = JwtHandler::new(SECRET);

        assert!(matches!(
            handler.validate("invalid.token.here"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            handler.validate("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(handler.validate(""), Err(TokenError::Malformed(_))));
    }
}
