mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use common::{body_to_vec, message_at, schedule_at, FakeBackend, TestApp};
use serde::Deserialize;
use sibima_admin::models::ScheduleStatus;

#[derive(Deserialize)]
struct FeedItem {
    #[serde(rename = "type")]
    kind: String,
    user: String,
}

fn seeded_app() -> TestApp {
    TestApp::new(FakeBackend {
        messages: vec![message_at(30, "Ana Putri"), message_at(10, "Budi Santoso")],
        schedules: vec![
            schedule_at(25, ScheduleStatus::Approved, "Dr. Sari Wijaya"),
            schedule_at(5, ScheduleStatus::Pending, "Citra Dewi"),
        ],
        ..Default::default()
    })
}

#[tokio::test]
async fn feed_interleaves_sources_by_time() -> Result<()> {
    let app = seeded_app();

    let response = app.get("/api/activity").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_vec(response.into_body()).await?;
    let feed: Vec<FeedItem> = serde_json::from_slice(&body)?;

    let order: Vec<&str> = feed.iter().map(|item| item.user.as_str()).collect();
    assert_eq!(
        order,
        vec!["Ana Putri", "Dr. Sari Wijaya", "Budi Santoso", "Citra Dewi"]
    );
    Ok(())
}

#[tokio::test]
async fn type_filter_keeps_one_source() -> Result<()> {
    let app = seeded_app();

    let response = app.get("/api/activity?type=schedule").await?;
    let body = body_to_vec(response.into_body()).await?;
    let feed: Vec<FeedItem> = serde_json::from_slice(&body)?;

    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|item| item.kind == "schedule"));
    Ok(())
}

#[tokio::test]
async fn export_downloads_the_filtered_feed() -> Result<()> {
    let app = seeded_app();

    let response = app.get("/api/activity/export?type=message").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(disposition.contains("activity_log.csv"));

    let body = body_to_vec(response.into_body()).await?;
    let csv = String::from_utf8(body)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Time,Type,User,Action");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("message,Ana Putri,sent a message"));
    assert!(lines[2].contains("Budi Santoso"));
    Ok(())
}
