//! Signed, time-bounded bearer tokens.

pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use handler::DEFAULT_TOKEN_TTL_HOURS;
