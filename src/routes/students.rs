use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{rows_or_empty, row_or_none, StudentFilters};
use crate::derive::{student_status, StudentStatus};
use crate::error::{AppError, AppResult};
use crate::models::{StudentDetail, StudentWithAdvising};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StudentListQuery {
    search: Option<String>,
    angkatan: Option<i32>,
    /// Derived-status filter, applied after derivation.
    status: Option<StudentStatus>,
}

#[derive(Serialize)]
pub struct StudentEntry {
    #[serde(flatten)]
    pub student: StudentWithAdvising,
    pub status: StudentStatus,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentListQuery>,
) -> AppResult<Json<Vec<StudentEntry>>> {
    let filters = StudentFilters {
        search: params.search.filter(|term| !term.trim().is_empty()),
        angkatan: params.angkatan,
    };
    let rows = rows_or_empty(state.backend.list_students(&filters).await, "students");

    let entries = rows
        .into_iter()
        .map(|student| StudentEntry {
            status: student_status(&student),
            student,
        })
        .filter(|entry| params.status.map_or(true, |wanted| entry.status == wanted))
        .collect();

    Ok(Json(entries))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StudentDetail>> {
    row_or_none(state.backend.get_student(id).await, "student detail")
        .map(Json)
        .ok_or_else(AppError::not_found)
}
