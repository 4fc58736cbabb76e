use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant is recoverable at the request boundary: the JSON API maps it
/// to a status code and the command surface renders it as a chat reply.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Preference text cannot be empty")]
    EmptyInput,

    #[error("Preference not found: {0}")]
    NotFound(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("No preferences stored for this user")]
    NoPreferences,

    #[error("No clear confirmation is pending")]
    NoPendingConfirmation,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Recommendation service error: {0}")]
    RecommendationService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn recommendation_service(msg: impl Into<String>) -> Self {
        Self::RecommendationService(msg.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        // the request URL carries the API key
        let e = e.without_url();
        let message = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            e.to_string()
        };
        AppError::RecommendationService(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyInput | AppError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoPendingConfirmation => StatusCode::CONFLICT,
            AppError::NoPreferences => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RecommendationService(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
