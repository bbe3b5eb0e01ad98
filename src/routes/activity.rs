use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::activity::{merge_activity, ActivityItem, ActivityKind};
use crate::error::AppResult;
use crate::export::{download_headers, to_csv};
use crate::state::AppState;

const ACTIVITY_PAGE_LIMIT: usize = 50;
const EXPORT_COLUMNS: [&str; 4] = ["Time", "Type", "User", "Action"];

#[derive(Deserialize)]
pub struct ActivityListQuery {
    limit: Option<usize>,
    #[serde(rename = "type")]
    kind: Option<ActivityKind>,
}

async fn load_feed(state: &AppState, params: &ActivityListQuery) -> Vec<ActivityItem> {
    let limit = params.limit.unwrap_or(ACTIVITY_PAGE_LIMIT);
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

    let feed = merge_activity(&messages, &schedules, limit);
    match params.kind {
        Some(kind) => feed.into_iter().filter(|item| item.kind == kind).collect(),
        None => feed,
    }
}

pub async fn list_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityListQuery>,
) -> AppResult<Json<Vec<ActivityItem>>> {
    Ok(Json(load_feed(&state, &params).await))
}

pub async fn export_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityListQuery>,
) -> AppResult<(HeaderMap, String)> {
    let feed = load_feed(&state, &params).await;

    let rows: Vec<Vec<String>> = feed
        .iter()
        .map(|item| {
            vec![
                item.time.format("%d %b %Y %H:%M").to_string(),
                item.kind.as_str().to_string(),
                item.user.clone(),
                item.action.clone(),
            ]
        })
        .collect();

    let csv = to_csv(&EXPORT_COLUMNS, &rows);
    Ok((download_headers("activity_log.csv"), csv))
}
