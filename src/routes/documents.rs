use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::backend::rows_or_empty;
use crate::error::AppResult;
use crate::models::DocumentWithContext;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DocumentListQuery {
    search: Option<String>,
}

/// Uploaded documents, newest first. The search matches file name or
/// uploader name, case-insensitively, on the fetched set.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentListQuery>,
) -> AppResult<Json<Vec<DocumentWithContext>>> {
    let rows = rows_or_empty(state.backend.list_documents().await, "documents");

    let documents = match params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        Some(term) => {
            let needle = term.to_lowercase();
            rows.into_iter()
                .filter(|doc| {
                    doc.file_name.to_lowercase().contains(&needle)
                        || doc
                            .uploader
                            .as_ref()
                            .map_or(false, |u| u.full_name.to_lowercase().contains(&needle))
                })
                .collect()
        }
        None => rows,
    };

    Ok(Json(documents))
}
