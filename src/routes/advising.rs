use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::{rows_or_empty, BimbinganFilters};
use crate::error::AppResult;
use crate::models::{Bimbingan, BimbinganStatus, BimbinganWithParties};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BimbinganListQuery {
    status: Option<BimbinganStatus>,
    dosen_id: Option<Uuid>,
}

pub async fn list_bimbingan(
    State(state): State<AppState>,
    Query(params): Query<BimbinganListQuery>,
) -> AppResult<Json<Vec<BimbinganWithParties>>> {
    let filters = BimbinganFilters {
        status: params.status,
        dosen_id: params.dosen_id,
    };
    let rows = rows_or_empty(state.backend.list_bimbingan(&filters).await, "bimbingan");
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub mahasiswa_id: Uuid,
    pub dosen_id: Uuid,
}

/// Assigns an advisor to a student by opening a new active advising
/// record. Mutation failures propagate instead of degrading.
pub async fn assign_bimbingan(
    State(state): State<AppState>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<(StatusCode, Json<Bimbingan>)> {
    let record = state
        .backend
        .assign_bimbingan(payload.mahasiswa_id, payload.dosen_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
