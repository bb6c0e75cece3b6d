use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, TokenHandler};

/// Bearer-token guard for the /items routes.
///
/// Missing header, non-Bearer scheme, undecodable token and expired token
/// are distinct failures; all of them answer 403.
pub async fn require_bearer(
    State(tokens): State<TokenHandler>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;
    let value = header.to_str().map_err(|_| AuthError::MissingCredentials)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::Scheme)?;
    if token.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    match tokens.decode_token(token)? {
        Some(_) => Ok(next.run(request).await),
        None => Err(AuthError::Invalid),
    }
}
