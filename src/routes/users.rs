use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{UpsertUser, User};
use crate::state::AppState;

/// Admin user create/update. The backend keys the upsert on `id` when
/// present; mutation failures propagate.
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(payload): Json<UpsertUser>,
) -> AppResult<Json<User>> {
    let user = state.backend.upsert_user(&payload).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.backend.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
