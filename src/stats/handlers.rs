use super::protocol::StatsParams;
use super::request::StatsRequest;
use super::response::StatsResponses;
use super::service::FollowStatsService;
use crate::error::StatsError;

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_follow_stats(
    Extension(service): Extension<Arc<FollowStatsService>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponses>, StatsError> {
    let request = StatsRequest::from_query(params.indices.as_deref())?;
    let response = service.stats(&request).await?;
    Ok(Json(response))
}

pub async fn handle_index_follow_stats(
    Extension(service): Extension<Arc<FollowStatsService>>,
    Path(index): Path<String>,
) -> Result<Json<StatsResponses>, StatsError> {
    let request = StatsRequest::for_indices([index])?;
    let response = service.stats(&request).await?;
    Ok(Json(response))
}
