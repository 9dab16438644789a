//! Authentication utilities library
//!
//! Provides the storage-free half of request authentication:
//! - Password hashing (Argon2id) and verification
//! - Signed, time-bounded bearer tokens (HS256 JWT)
//! - An `Authenticator` combining both for login flows
//!
//! Tokens are stateless. Nothing here keeps a session record, so expiry or a
//! secret rotation are the only ways a token stops being accepted.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "42", "alice").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
