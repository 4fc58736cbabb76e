use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{bot::Reply, middleware::RequestId, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

/// Handler for chat commands forwarded by a transport
///
/// Always answers 200; failures are part of the reply text.
pub async fn handle(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CommandRequest>,
) -> Json<Reply> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "Processing chat command");
    Json(state.commands.handle(&user_id, &request.text).await)
}
