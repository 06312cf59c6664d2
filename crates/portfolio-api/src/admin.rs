use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use portfolio_db::models::SubmissionRow;
use portfolio_types::api::{ApiEnvelope, UpdateSubmissionRequest};
use portfolio_types::models::{ContactSubmission, SubmissionPriority, SubmissionStatus};

use crate::ApiError;
use crate::auth::AppState;

const INBOX_LIMIT: u32 = 200;

/// Admin inbox, newest first.
pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<Json<ApiEnvelope<Vec<ContactSubmission>>>, ApiError> {
    let rows = state.db.list_submissions(INBOX_LIMIT).map_err(|e| {
        warn!("Failed to list submissions: {}", e);
        ApiError::internal()
    })?;

    let submissions = rows
        .into_iter()
        .map(submission_from_row)
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(|e| {
            warn!("Corrupt submission row: {}", e);
            ApiError::internal()
        })?;

    Ok(Json(ApiEnvelope::ok(submissions)))
}

/// Move a submission through its lifecycle. Fields absent from the body
/// keep their current value; marking a submission replied stamps the
/// replied-at time.
pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubmissionRequest>,
) -> Result<Json<ApiEnvelope<ContactSubmission>>, ApiError> {
    if req.status.is_none() && req.priority.is_none() {
        return Err(ApiError::bad_request("Nothing to update."));
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let replied_at = match req.status {
        Some(SubmissionStatus::Replied) => Some(now.as_str()),
        _ => None,
    };

    let found = state
        .db
        .update_submission(
            &id.to_string(),
            req.status.map(|s| s.as_str()),
            req.priority.map(|p| p.as_str()),
            replied_at,
            &now,
        )
        .map_err(|e| {
            warn!("Failed to update submission {}: {}", id, e);
            ApiError::internal()
        })?;

    if !found {
        return Err(ApiError::not_found("Submission not found."));
    }

    let row = state
        .db
        .get_submission(&id.to_string())
        .map_err(|e| {
            warn!("Failed to re-read submission {}: {}", id, e);
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("Submission not found."))?;

    info!(
        "Submission {} updated (status: {:?}, priority: {:?})",
        id, req.status, req.priority
    );

    let submission = submission_from_row(row).map_err(|e| {
        warn!("Corrupt submission row {}: {}", id, e);
        ApiError::internal()
    })?;

    Ok(Json(ApiEnvelope::ok(submission)))
}

fn submission_from_row(row: SubmissionRow) -> anyhow::Result<ContactSubmission> {
    Ok(ContactSubmission {
        id: row.id.parse()?,
        name: row.name,
        email: row.email,
        subject: row.subject,
        message: row.message,
        status: SubmissionStatus::parse(&row.status)
            .ok_or_else(|| anyhow::anyhow!("unknown status: {}", row.status))?,
        priority: SubmissionPriority::parse(&row.priority)
            .ok_or_else(|| anyhow::anyhow!("unknown priority: {}", row.priority))?,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        replied_at: row.replied_at.as_deref().map(parse_timestamp).transpose()?,
        ip_address: row.ip_address,
        user_agent: row.user_agent,
        referrer: row.referrer,
    })
}

fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}
