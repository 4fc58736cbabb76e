use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, middleware::RequestId, models::RecommendationResult, routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub category: String,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        category = %params.category,
        "Processing recommendation request"
    );

    let result = state
        .recommender
        .recommend(&user_id, &params.category)
        .await?;

    tracing::info!(
        request_id = %request_id,
        results = result.items.len(),
        "Recommendation completed"
    );

    Ok(Json(result))
}
