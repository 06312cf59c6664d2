use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use tracing::{info, warn};
use uuid::Uuid;

use portfolio_db::queries::NewSubmission;
use portfolio_types::api::{ApiEnvelope, ContactReceipt, ContactRequest, ValidationErrorResponse};
use portfolio_types::validation::ValidationOutcome;

use crate::ApiError;
use crate::auth::AppState;

const THANK_YOU: &str = "Thank you for your message! I'll get back to you soon.";

/// Public contact form endpoint. Validation failures come back as a
/// field->message map; a populated honeypot gets the same success shape a
/// real submission gets and is dropped without a trace in the response.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ContactRequest>,
) -> Result<Response, ApiError> {
    match state.validator.validate(&req) {
        ValidationOutcome::Bot => {
            warn!("Honeypot tripped, dropping submission from '{}'", req.email);
            let receipt = ContactReceipt {
                id: Uuid::new_v4(),
                created_at: chrono::Utc::now(),
            };
            Ok((
                StatusCode::CREATED,
                Json(ApiEnvelope::ok_with_message(receipt, THANK_YOU)),
            )
                .into_response())
        }
        ValidationOutcome::Invalid(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse {
                success: false,
                errors,
                message: "Please check your form data and try again.".into(),
            }),
        )
            .into_response()),
        ValidationOutcome::Valid => {
            let id = Uuid::new_v4();
            let created_at = chrono::Utc::now();
            let subject = match req.subject.trim() {
                "" => "Contact Form Submission",
                s => s,
            };

            state
                .db
                .insert_submission(&NewSubmission {
                    id: &id.to_string(),
                    name: req.name.trim(),
                    email: req.email.trim(),
                    subject,
                    message: req.message.trim(),
                    ip_address: header_str(&headers, "x-forwarded-for").as_deref(),
                    user_agent: header_str(&headers, header::USER_AGENT.as_str()).as_deref(),
                    referrer: header_str(&headers, header::REFERER.as_str()).as_deref(),
                    created_at: &created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                })
                .map_err(|e| {
                    warn!("Failed to persist submission: {}", e);
                    ApiError::internal()
                })?;

            info!("New contact submission {} from '{}'", id, req.email);

            Ok((
                StatusCode::CREATED,
                Json(ApiEnvelope::ok_with_message(
                    ContactReceipt { id, created_at },
                    THANK_YOU,
                )),
            )
                .into_response())
        }
    }
}

/// First value of a header, if present and valid UTF-8. For
/// x-forwarded-for that is the client address, before any proxy hops.
fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
}
