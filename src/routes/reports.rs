use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::rows_or_empty;
use crate::derive::{report_totals, skp_metrics, ReportTotals};
use crate::error::AppResult;
use crate::export::{download_headers, to_csv};
use crate::models::{SkpRecord, SkpRecordWithDosen};
use crate::state::AppState;

const EXPORT_COLUMNS: [&str; 7] = [
    "Advisor",
    "NIDN",
    "Total Sessions",
    "Students",
    "Completed",
    "Response Rate",
    "Avg Response",
];

#[derive(Deserialize)]
pub struct SkpListQuery {
    periode: String,
}

#[derive(Serialize)]
pub struct SkpReportResponse {
    pub records: Vec<SkpRecordWithDosen>,
    pub totals: ReportTotals,
}

pub async fn list_skp(
    State(state): State<AppState>,
    Query(params): Query<SkpListQuery>,
) -> AppResult<Json<SkpReportResponse>> {
    let records = rows_or_empty(
        state.backend.list_skp_reports(&params.periode).await,
        "skp reports",
    );
    let totals = report_totals(&records);
    Ok(Json(SkpReportResponse { records, totals }))
}

#[derive(Deserialize)]
pub struct GenerateSkpRequest {
    pub dosen_id: Uuid,
    pub periode: String,
}

/// Recomputes and stores one advisor's SKP counters from their advising
/// records. This is a mutation flow, so failures propagate.
pub async fn generate_skp(
    State(state): State<AppState>,
    Json(payload): Json<GenerateSkpRequest>,
) -> AppResult<Json<SkpRecord>> {
    let records = state.backend.bimbingan_for_skp(payload.dosen_id).await?;
    let metrics = skp_metrics(payload.dosen_id, &payload.periode, &records);
    let stored = state.backend.upsert_skp_record(&metrics).await?;
    Ok(Json(stored))
}

pub async fn export_skp(
    State(state): State<AppState>,
    Query(params): Query<SkpListQuery>,
) -> AppResult<(HeaderMap, String)> {
    let records = rows_or_empty(
        state.backend.list_skp_reports(&params.periode).await,
        "skp reports",
    );

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|entry| {
            let advisor_name = entry
                .dosen
                .as_ref()
                .map(|dosen| dosen.full_name.clone())
                .unwrap_or_else(|| "-".to_string());
            let advisor_nidn = entry
                .dosen
                .as_ref()
                .map(|dosen| dosen.nim_nidn.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![
                advisor_name,
                advisor_nidn,
                entry.record.total_sessions.to_string(),
                entry.record.total_mahasiswa.to_string(),
                entry.record.completed_mahasiswa.to_string(),
                format!("{}%", entry.record.response_rate),
                format!("{}h", entry.record.avg_response_time_hours),
            ]
        })
        .collect();

    let csv = to_csv(&EXPORT_COLUMNS, &rows);
    let filename = format!("skp_report_{}.csv", params.periode);
    Ok((download_headers(&filename), csv))
}
