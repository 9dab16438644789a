use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a bearer token.
///
/// Self-contained: validation trusts these fields as-is and never consults
/// storage, so an identity change after issuance is invisible until `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Display name of the identity at issuance time
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, valid from `issued_at` for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - Unique identity identifier
    /// * `username` - Display name
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime of the token
    pub fn for_user(
        user_id: impl ToString,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token stops being valid at the exact second of `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Expiration as a UTC instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
