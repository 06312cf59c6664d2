use axum::{
    Json,
    extract::{Query, State},
};
use tracing::warn;

use portfolio_types::api::{ApiEnvelope, TagQuery};
use portfolio_types::models::{SortOrder, Tag, TagSortKey, sort_tags};

use crate::ApiError;
use crate::auth::AppState;

/// Public tag listing for the blog filter bar. Unknown sort parameters
/// fall back to the defaults (count, descending).
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<ApiEnvelope<Vec<Tag>>>, ApiError> {
    let key = query
        .sort_by
        .as_deref()
        .and_then(TagSortKey::parse)
        .unwrap_or_default();
    let order = query
        .order
        .as_deref()
        .and_then(SortOrder::parse)
        .unwrap_or_default();

    let rows = state.db.list_tags().map_err(|e| {
        warn!("Failed to read tags: {}", e);
        ApiError::internal()
    })?;

    let mut tags: Vec<Tag> = rows
        .into_iter()
        .map(|row| Tag {
            name: row.name,
            count: row.usage_count,
        })
        .collect();

    sort_tags(&mut tags, key, order);

    Ok(Json(ApiEnvelope::ok(tags)))
}
