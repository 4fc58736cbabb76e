use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{ClearOutcome, ClearToken, SetOutcome},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PreferenceRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub user_id: String,
    pub preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: String,
}

#[derive(Debug, Serialize)]
pub struct ClearPromptResponse {
    pub token: ClearToken,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmClearRequest {
    pub confirm: bool,
}

/// Handler for listing a user's preferences
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<PreferencesResponse> {
    let preferences = state.preferences.list_preferences(&user_id).await;
    Json(PreferencesResponse {
        user_id,
        preferences,
    })
}

/// Handler for adding a preference; 201 when added, 200 when already present
pub async fn add(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PreferenceRequest>,
) -> AppResult<(StatusCode, Json<SetOutcome>)> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "Adding preference");

    let outcome = state
        .preferences
        .set_preference(&user_id, &request.text)
        .await?;

    let status = match outcome {
        SetOutcome::Added { .. } => StatusCode::CREATED,
        SetOutcome::AlreadyPresent { .. } => StatusCode::OK,
    };

    Ok((status, Json(outcome)))
}

/// Handler for removing one preference
pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PreferenceRequest>,
) -> AppResult<Json<RemoveResponse>> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "Removing preference");

    let removed = state
        .preferences
        .remove_preference(&user_id, &request.text)
        .await?;

    Ok(Json(RemoveResponse { removed }))
}

/// Handler for the first step of clearing: issues a confirmation token
pub async fn request_clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<ClearPromptResponse>) {
    let token = state.preferences.request_clear(&user_id);
    (
        StatusCode::ACCEPTED,
        Json(ClearPromptResponse {
            token,
            message: "Confirm to delete all preferences",
        }),
    )
}

/// Handler for the second step of clearing
pub async fn confirm_clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ConfirmClearRequest>,
) -> AppResult<Json<ClearOutcome>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        confirm = request.confirm,
        "Resolving clear confirmation"
    );

    let outcome = state
        .preferences
        .confirm_clear(&user_id, request.confirm.into())
        .await?;

    Ok(Json(outcome))
}
