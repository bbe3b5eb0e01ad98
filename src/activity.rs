//! Recent-activity feed: merges the message stream and the schedule-change
//! stream into one reverse-chronological list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MessageWithSender, ScheduleStatus, ScheduleWithRequester};

const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Message,
    Schedule,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Message => "message",
            ActivityKind::Schedule => "schedule",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user: String,
    pub action: String,
    pub time: DateTime<Utc>,
}

/// Merges two already-limited, time-ordered sources into one feed sorted
/// descending by timestamp and capped at `limit`. The sort is stable, so
/// identical timestamps keep insertion order (messages before schedules).
pub fn merge_activity(
    messages: &[MessageWithSender],
    schedules: &[ScheduleWithRequester],
    limit: usize,
) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = Vec::with_capacity(messages.len() + schedules.len());

    for message in messages {
        items.push(ActivityItem {
            id: message.id,
            kind: ActivityKind::Message,
            user: message
                .sender
                .as_ref()
                .map(|sender| sender.full_name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            action: "sent a message".to_string(),
            time: message.created_at,
        });
    }

    for schedule in schedules {
        items.push(ActivityItem {
            id: schedule.schedule.id,
            kind: ActivityKind::Schedule,
            user: schedule
                .requester
                .as_ref()
                .map(|requester| requester.full_name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            action: schedule_action(schedule.schedule.status),
            time: schedule.schedule.created_at,
        });
    }

    items.sort_by(|a, b| b.time.cmp(&a.time));
    items.truncate(limit);
    items
}

fn schedule_action(status: ScheduleStatus) -> String {
    match status {
        ScheduleStatus::Pending => "requested an advising session".to_string(),
        other => format!("session {}", other.as_str()),
    }
}
