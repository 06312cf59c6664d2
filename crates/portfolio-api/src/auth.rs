use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Extension, Json, extract::State};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use portfolio_db::Database;
use portfolio_types::api::{
    ApiEnvelope, Claims, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, TokenKind,
    TokenPair, VerifyResponse,
};
use portfolio_types::validation::ContactValidator;

use crate::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub admin: AdminAccount,
    pub validator: ContactValidator,
}

/// The single admin account, seeded from the environment at startup.
pub struct AdminAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

const ACCESS_TTL_HOURS: i64 = 24;
const REFRESH_TTL_DAYS: i64 = 30;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiEnvelope<LoginResponse>>, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required."));
    }

    if req.username != state.admin.username {
        return Err(ApiError::unauthorized("Invalid credentials."));
    }

    let parsed_hash =
        PasswordHash::new(&state.admin.password_hash).map_err(|_| ApiError::internal())?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::unauthorized("Invalid credentials."))?;

    let tokens = issue_token_pair(&state.jwt_secret, state.admin.id, &state.admin.username)
        .map_err(|_| ApiError::internal())?;

    Ok(Json(ApiEnvelope::ok(LoginResponse {
        user_id: state.admin.id,
        username: state.admin.username.clone(),
        tokens,
    })))
}

/// Succeeds iff the middleware accepted the bearer token, so the body is
/// just an acknowledgement the client's gate can branch on.
pub async fn verify(
    Extension(claims): Extension<Claims>,
) -> Json<ApiEnvelope<VerifyResponse>> {
    Json(ApiEnvelope::ok(VerifyResponse {
        username: claims.username,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiEnvelope<RefreshResponse>>, ApiError> {
    let claims = decode_token(&state.jwt_secret, &req.refresh)
        .map_err(|_| ApiError::unauthorized("Invalid token."))?;

    if claims.kind != TokenKind::Refresh {
        return Err(ApiError::unauthorized("Invalid token."));
    }

    let access = create_token(
        &state.jwt_secret,
        &claims.sub,
        &claims.username,
        TokenKind::Access,
        chrono::Duration::hours(ACCESS_TTL_HOURS),
    )
    .map_err(|_| ApiError::internal())?;

    Ok(Json(ApiEnvelope::ok(RefreshResponse { access })))
}

/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client clears its own store. The endpoint exists so logout is still an
/// authenticated, observable action.
pub async fn logout(
    Extension(claims): Extension<Claims>,
) -> Json<ApiEnvelope<()>> {
    tracing::info!("Admin '{}' logged out", claims.username);
    Json(ApiEnvelope::ok_with_message((), "Successfully logged out."))
}

// -- Token helpers --

pub fn issue_token_pair(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<TokenPair> {
    let sub = user_id.to_string();
    Ok(TokenPair {
        access: create_token(
            secret,
            &sub,
            username,
            TokenKind::Access,
            chrono::Duration::hours(ACCESS_TTL_HOURS),
        )?,
        refresh: create_token(
            secret,
            &sub,
            username,
            TokenKind::Refresh,
            chrono::Duration::days(REFRESH_TTL_DAYS),
        )?,
    })
}

fn create_token(
    secret: &str,
    sub: &str,
    username: &str,
    kind: TokenKind,
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: sub.to_string(),
        username: username.to_string(),
        kind,
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_access_token_decodes_with_access_kind() {
        let pair = issue_token_pair("test-secret", Uuid::new_v4(), "admin").unwrap();

        let access = decode_token("test-secret", &pair.access).unwrap();
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.username, "admin");

        let refresh = decode_token("test-secret", &pair.refresh).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let pair = issue_token_pair("test-secret", Uuid::new_v4(), "admin").unwrap();
        assert!(decode_token("other-secret", &pair.access).is_err());
    }
}
