use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::entities::chat_turns;
use crate::server::app::AppState;
use crate::server::auth::CurrentUser;
use crate::server::error::ApiError;

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    /// Whether the answer was served from the exact-question cache.
    pub cached: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/chat",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant answer, cached or freshly generated"),
        (status = 404, description = "Project not found"),
        (status = 502, description = "The AI provider failed")
    )
)]
pub async fn ask(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = request.message.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("message is required"));
    }

    // Exact-string cache: identical questions never hit the provider twice.
    if let Some(answer) = state.projects.cached_answer(user.id, id, question).await? {
        return Ok(Json(ChatResponse {
            answer,
            cached: true,
        }));
    }

    let data = state.projects.get_file_data(user.id, id).await?;
    let answer = state.chat.answer(&data.columns, &data.rows, question).await?;
    state
        .projects
        .record_chat_turn(user.id, id, question, &answer)
        .await?;

    Ok(Json(ChatResponse {
        answer,
        cached: false,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/chat",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Chat turns in asked order"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<chat_turns::Model>>, ApiError> {
    let turns = state.projects.chat_history(user.id, id).await?;
    Ok(Json(turns))
}
