use thiserror::Error;

/// Error type for token operations.
///
/// The validation variants stay distinct for logging; callers facing the
/// outside world are expected to collapse them into a single message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
