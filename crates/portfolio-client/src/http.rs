use portfolio_types::api::{
    ApiEnvelope, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, TokenPair,
};
use reqwest::{Client, Response, StatusCode};

use crate::session::{AuthApi, AuthError};

/// [`AuthApi`] over HTTP against the portfolio API service.
pub struct HttpAuthApi {
    base_url: String,
    client: Client,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(e: reqwest::Error) -> AuthError {
    AuthError::Network(e.to_string())
}

/// Pull the server's error string out of a non-success envelope, falling
/// back to the status code when the body is not parseable.
async fn rejection(resp: Response) -> AuthError {
    let status = resp.status();
    let reason = match resp.json::<ApiEnvelope<serde_json::Value>>().await {
        Ok(envelope) => envelope.error.unwrap_or_else(|| format!("HTTP {}", status)),
        Err(_) => format!("HTTP {}", status),
    };
    AuthError::Rejected(reason)
}

/// Non-2xx statuses other than an explicit auth rejection are treated as
/// network failures: a 502 from a proxy says nothing about the token.
fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status == StatusCode::BAD_REQUEST
}

impl AuthApi for HttpAuthApi {
    async fn verify(&self, access: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .get(self.url("/api/auth/verify"))
            .bearer_auth(access)
            .send()
            .await
            .map_err(network)?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            s if is_auth_rejection(s) => Err(rejection(resp).await),
            s => Err(AuthError::Network(format!("HTTP {}", s))),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(network)?;

        match resp.status() {
            s if s.is_success() => {
                let envelope: ApiEnvelope<LoginResponse> = resp.json().await.map_err(network)?;
                envelope
                    .data
                    .map(|login| login.tokens)
                    .ok_or_else(|| AuthError::Network("login response missing data".into()))
            }
            s if is_auth_rejection(s) => Err(rejection(resp).await),
            s => Err(AuthError::Network(format!("HTTP {}", s))),
        }
    }

    async fn refresh(&self, refresh: &str) -> Result<String, AuthError> {
        let resp = self
            .client
            .post(self.url("/api/auth/refresh"))
            .json(&RefreshRequest {
                refresh: refresh.to_string(),
            })
            .send()
            .await
            .map_err(network)?;

        match resp.status() {
            s if s.is_success() => {
                let envelope: ApiEnvelope<RefreshResponse> = resp.json().await.map_err(network)?;
                envelope
                    .data
                    .map(|r| r.access)
                    .ok_or_else(|| AuthError::Network("refresh response missing data".into()))
            }
            s if is_auth_rejection(s) => Err(rejection(resp).await),
            s => Err(AuthError::Network(format!("HTTP {}", s))),
        }
    }

    async fn logout(&self, access: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.url("/api/auth/logout"))
            .bearer_auth(access)
            .send()
            .await
            .map_err(network)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(rejection(resp).await)
        }
    }
}
