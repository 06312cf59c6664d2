use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};

use portfolio_types::api::TokenKind;

use crate::auth::{AppState, decode_token};

/// Extract and validate the bearer JWT from the Authorization header.
/// Refresh tokens are not accepted here; only the refresh endpoint takes
/// those, in its body.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims =
        decode_token(&state.jwt_secret, token).map_err(|_| StatusCode::UNAUTHORIZED)?;

    if claims.kind != TokenKind::Access {
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
