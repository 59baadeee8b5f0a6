//! Authentication middleware for bearer token validation

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Extract the bearer token from an Authorization header value
///
/// A missing or malformed header is a credential-absent failure (401),
/// distinct from a present-but-invalid token (403).
fn bearer_token(header_value: Option<&str>) -> Result<&str, ApiError> {
    let value = header_value.ok_or(ApiError::Unauthorized)?;
    value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)
}

/// Validate the bearer token and attach its claims to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = bearer_token(header_value)?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Forbidden
    })?;

    // Downstream handlers can read the claims from the request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
