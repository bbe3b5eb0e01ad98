use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::activity::{merge_activity, ActivityItem};
use crate::derive::{dashboard_stats, DashboardStats, RawCounts};
use crate::error::AppResult;
use crate::models::{BimbinganStatus, ScheduleStatus, UserRole};
use crate::state::AppState;

/// Summary-card counts. The five backend counts are independent, so they
/// are issued concurrently; the group is all-or-nothing, and a failed
/// group degrades to zeroed counts rather than failing the page.
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let backend = &state.backend;
    let counts = match tokio::try_join!(
        backend.count_users_by_role(UserRole::Student),
        backend.count_users_by_role(UserRole::Advisor),
        backend.count_bimbingan_by_status(BimbinganStatus::Active),
        backend.count_bimbingan_by_status(BimbinganStatus::Completed),
        backend.count_schedules_by_status(ScheduleStatus::Completed),
    ) {
        Ok((
            total_mahasiswa,
            total_dosen,
            active_bimbingan,
            completed_bimbingan,
            completed_sessions,
        )) => RawCounts {
            total_mahasiswa,
            total_dosen,
            active_bimbingan,
            completed_bimbingan,
            completed_sessions,
        },
        Err(error) => {
            tracing::warn!(%error, "dashboard counts failed; serving zeroed stats");
            RawCounts::default()
        }
    };

    Ok(Json(dashboard_stats(counts)))
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    limit: Option<usize>,
}

pub async fn recent_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityItem>>> {
    let limit = params.limit.unwrap_or(state.config.activity_feed_limit);
    let backend = &state.backend;

    let (messages, schedules) = match tokio::try_join!(
        backend.recent_messages(limit),
        backend.recent_schedules(limit),
    ) {
        Ok(sources) => sources,
        Err(error) => {
            tracing::warn!(%error, "activity sources failed; serving empty feed");
            (Vec::new(), Vec::new())
        }
    };

    Ok(Json(merge_activity(&messages, &schedules, limit)))
}
