use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{SubmissionPriority, SubmissionStatus};

// -- JWT Claims --

/// JWT claims shared between portfolio-api (issuing and middleware) and any
/// service verifying tokens out of band. Canonical definition lives here in
/// portfolio-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    /// Distinguishes access from refresh tokens issued on the same secret.
    pub kind: TokenKind,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

// -- Envelope --

/// Success/error envelope every endpoint responds with. Mirrors what the
/// admin dashboard and contact form expect: `success` plus either `data`
/// or `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Access/refresh token pair returned on login and held by the client's
/// credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub username: String,
}

// -- Contact --

/// What the contact form sends. The honeypot field is rendered invisibly
/// on the form; humans leave it empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub honeypot: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 400 body for a submission that failed field validation: the form
/// annotates each named field with its message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub errors: std::collections::BTreeMap<String, String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSubmissionRequest {
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    #[serde(default)]
    pub priority: Option<SubmissionPriority>,
}

// -- Tags --

#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}
