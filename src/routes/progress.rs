use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::rows_or_empty;
use crate::derive::{
    group_milestones, milestone_status_counts, timeline, MilestoneStatusCounts, StudentProgress,
    TimelineEntry,
};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProgressQuery {
    mahasiswa_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ProgressGroup {
    #[serde(flatten)]
    pub group: StudentProgress,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub stats: MilestoneStatusCounts,
    pub groups: Vec<ProgressGroup>,
}

/// Milestone progress per student: the flat milestone list bucketed by
/// student, each bucket rendered against the fixed seven-step timeline.
/// The status counters cover all fetched milestones, before any student
/// filter.
pub async fn milestone_progress(
    State(state): State<AppState>,
    Query(params): Query<ProgressQuery>,
) -> AppResult<Json<ProgressResponse>> {
    let rows = rows_or_empty(
        state.backend.list_milestones_with_context().await,
        "milestones",
    );
    let stats = milestone_status_counts(&rows);

    let groups = group_milestones(&rows)
        .into_iter()
        .filter(|group| match params.mahasiswa_id {
            Some(wanted) => group
                .student
                .as_ref()
                .map_or(false, |student| student.id == wanted),
            None => true,
        })
        .map(|group| ProgressGroup {
            timeline: timeline(&group.milestones),
            group,
        })
        .collect();

    Ok(Json(ProgressResponse { stats, groups }))
}
