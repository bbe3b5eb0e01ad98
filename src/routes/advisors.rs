use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{row_or_none, rows_or_empty};
use crate::error::{AppError, AppResult};
use crate::models::{AdvisorDetail, SkpRecord, User};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AdvisorListQuery {
    search: Option<String>,
}

#[derive(Serialize)]
pub struct AdvisorEntry {
    #[serde(flatten)]
    pub user: User,
    pub advising_count: i64,
}

pub async fn list_advisors(
    State(state): State<AppState>,
    Query(params): Query<AdvisorListQuery>,
) -> AppResult<Json<Vec<AdvisorEntry>>> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());
    let rows = rows_or_empty(state.backend.list_advisors(search).await, "advisors");

    let entries = rows
        .into_iter()
        .map(|advisor| AdvisorEntry {
            advising_count: advisor.advising_count(),
            user: advisor.user,
        })
        .collect();

    Ok(Json(entries))
}

pub async fn get_advisor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AdvisorDetail>> {
    row_or_none(state.backend.get_advisor(id).await, "advisor detail")
        .map(Json)
        .ok_or_else(AppError::not_found)
}

#[derive(Deserialize)]
pub struct AdvisorSkpQuery {
    periode: String,
}

pub async fn get_advisor_skp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AdvisorSkpQuery>,
) -> AppResult<Json<SkpRecord>> {
    row_or_none(
        state.backend.get_advisor_skp(id, &params.periode).await,
        "advisor skp",
    )
    .map(Json)
    .ok_or_else(AppError::not_found)
}
