use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash could not be parsed. Fatal to the single verification
    /// attempt only.
    #[error("Stored credential is corrupt: {0}")]
    CorruptCredential(String),
}
