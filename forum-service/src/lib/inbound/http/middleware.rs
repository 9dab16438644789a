use std::sync::Arc;

use auth::Authenticator;
use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;

/// Identity attached to the request extensions by the authentication gate.
///
/// Trusted as issued: the user is not re-read from storage, so changes made
/// after issuance stay invisible until the token expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Why a request could not be tied to an identity. Only ever logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not of the form 'Bearer <token>'")]
    InvalidHeaderFormat,

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Token subject is not a user ID: {0}")]
    InvalidSubject(String),
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        let message = match err {
            GateError::MissingHeader => "Authorization header required",
            GateError::InvalidHeaderFormat => "Invalid authorization header format",
            GateError::InvalidToken(_) | GateError::InvalidSubject(_) => "Invalid or expired token",
        };
        ApiError::Unauthenticated(message.to_string())
    }
}

/// Resolve the caller from the `Authorization` header. Pure, no storage access.
pub fn resolve_identity(
    authenticator: &Authenticator,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, GateError> {
    let token = extract_bearer_token(headers)?;
    let claims = authenticator.validate_token(token)?;
    let user_id =
        UserId::from_string(&claims.sub).map_err(|e| GateError::InvalidSubject(e.to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        username: claims.username,
    })
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GateError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(GateError::MissingHeader)?;

    header
        .to_str()
        .map_err(|_| GateError::InvalidHeaderFormat)?
        .strip_prefix("Bearer ")
        .ok_or(GateError::InvalidHeaderFormat)
}

/// Mandatory gate: rejects with 401 before the inner handler runs.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_identity(&authenticator, req.headers()).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Authentication failed");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Optional gate: any failure lets the request through as a guest.
pub async fn authenticate_optional(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_identity(&authenticator, req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
        }
        Err(GateError::MissingHeader) => {}
        Err(e) => {
            tracing::debug!(error = %e, "Proceeding without identity");
        }
    }

    next.run(req).await
}
