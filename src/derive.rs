//! Pure read-model derivations: per-student status, milestone grouping and
//! timelines, dashboard aggregates, and SKP report counters. No I/O here;
//! every function is a stateless transform of already-fetched rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    BimbinganForSkp, BimbinganStatus, Milestone, MilestoneKind, MilestoneStatus,
    MilestoneWithContext, NewSkpRecord, ScheduleStatus, SkpRecordWithDosen, StudentRef,
    StudentWithAdvising, UserRef, MILESTONE_SEQUENCE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Completed,
    Unassigned,
}

/// Overall advising status for one student. Priority order, not recency:
/// any `active` record wins, then any `completed`, else `unassigned`.
pub fn overall_status(statuses: &[BimbinganStatus]) -> StudentStatus {
    if statuses.contains(&BimbinganStatus::Active) {
        StudentStatus::Active
    } else if statuses.contains(&BimbinganStatus::Completed) {
        StudentStatus::Completed
    } else {
        StudentStatus::Unassigned
    }
}

pub fn student_status(student: &StudentWithAdvising) -> StudentStatus {
    let statuses: Vec<BimbinganStatus> =
        student.bimbingan.iter().map(|record| record.status).collect();
    overall_status(&statuses)
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProgress {
    pub student: Option<StudentRef>,
    pub advisor: Option<UserRef>,
    pub thesis_title: Option<String>,
    pub milestones: Vec<Milestone>,
}

/// Buckets a flat milestone list per student, keeping first-seen order.
/// Milestones whose advising record or student is missing share one
/// anonymous bucket; groups exist only for students that actually have
/// fetched milestones.
pub fn group_milestones(rows: &[MilestoneWithContext]) -> Vec<StudentProgress> {
    let mut groups: Vec<StudentProgress> = Vec::new();
    let mut index: HashMap<Option<Uuid>, usize> = HashMap::new();

    for row in rows {
        let context = row.bimbingan.as_ref();
        let key = context.and_then(|b| b.mahasiswa.as_ref()).map(|m| m.id);
        let position = *index.entry(key).or_insert_with(|| {
            groups.push(StudentProgress {
                student: context.and_then(|b| b.mahasiswa.clone()),
                advisor: context.and_then(|b| b.dosen.clone()),
                thesis_title: context.and_then(|b| b.judul_skripsi.clone()),
                milestones: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].milestones.push(row.milestone.clone());
    }

    groups
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub kind: MilestoneKind,
    pub status: MilestoneStatus,
}

/// Renders one student's milestones against the fixed seven-step sequence.
/// A type with no row is implicitly `pending`; duplicates resolve to the
/// first row found.
pub fn timeline(milestones: &[Milestone]) -> Vec<TimelineEntry> {
    MILESTONE_SEQUENCE
        .iter()
        .map(|kind| TimelineEntry {
            kind: *kind,
            status: milestones
                .iter()
                .find(|m| m.milestone_type == *kind)
                .map(|m| m.status)
                .unwrap_or(MilestoneStatus::Pending),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MilestoneStatusCounts {
    pub approved: usize,
    pub in_progress: usize,
    pub revision: usize,
    pub total: usize,
}

pub fn milestone_status_counts(rows: &[MilestoneWithContext]) -> MilestoneStatusCounts {
    let mut counts = MilestoneStatusCounts {
        total: rows.len(),
        ..Default::default()
    };
    for row in rows {
        match row.milestone.status {
            MilestoneStatus::Approved => counts.approved += 1,
            MilestoneStatus::InProgress => counts.in_progress += 1,
            MilestoneStatus::Revision => counts.revision += 1,
            MilestoneStatus::Pending => {}
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawCounts {
    pub total_mahasiswa: u64,
    pub total_dosen: u64,
    pub active_bimbingan: u64,
    pub completed_bimbingan: u64,
    pub completed_sessions: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardStats {
    pub total_mahasiswa: u64,
    pub total_dosen: u64,
    pub active_bimbingan: u64,
    pub completed_bimbingan: u64,
    pub on_track_students: u64,
    pub delayed_students: u64,
    pub at_risk_students: u64,
    pub avg_sessions_per_student: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSplit {
    pub on_track: u64,
    pub delayed: u64,
    pub at_risk: u64,
}

/// Placeholder breakdown of active advising records into
/// on-track/delayed/at-risk: a fixed 70/20/10 floor-divided split, not a
/// timeliness computation. Stands in until a milestone-deadline-backed
/// formula exists.
pub fn placeholder_progress_split(active_bimbingan: u64) -> ProgressSplit {
    ProgressSplit {
        on_track: active_bimbingan * 70 / 100,
        delayed: active_bimbingan * 20 / 100,
        at_risk: active_bimbingan * 10 / 100,
    }
}

/// Completed sessions per active advising record, one decimal, zero when
/// there are no active records.
pub fn average_sessions(completed_sessions: u64, active_bimbingan: u64) -> f64 {
    if active_bimbingan == 0 {
        return 0.0;
    }
    round_one_decimal(completed_sessions as f64 / active_bimbingan as f64)
}

pub fn dashboard_stats(counts: RawCounts) -> DashboardStats {
    let split = placeholder_progress_split(counts.active_bimbingan);
    DashboardStats {
        total_mahasiswa: counts.total_mahasiswa,
        total_dosen: counts.total_dosen,
        active_bimbingan: counts.active_bimbingan,
        completed_bimbingan: counts.completed_bimbingan,
        on_track_students: split.on_track,
        delayed_students: split.delayed,
        at_risk_students: split.at_risk,
        avg_sessions_per_student: average_sessions(
            counts.completed_sessions,
            counts.active_bimbingan,
        ),
    }
}

/// Placeholder response metrics for SKP reports; message read timestamps
/// are fetched but not yet folded into a real computation.
pub const PLACEHOLDER_RESPONSE_RATE: f64 = 95.0;
pub const PLACEHOLDER_AVG_RESPONSE_HOURS: f64 = 2.0;

/// Counters for one advisor's participation-credit (SKP) report: linked
/// students, completed students, and completed sessions summed across all
/// of their advising records.
pub fn skp_metrics(dosen_id: Uuid, periode: &str, records: &[BimbinganForSkp]) -> NewSkpRecord {
    let total_mahasiswa = records.len() as i64;
    let completed_mahasiswa = records
        .iter()
        .filter(|record| record.status == BimbinganStatus::Completed)
        .count() as i64;
    let total_sessions = records
        .iter()
        .map(|record| {
            record
                .schedules
                .iter()
                .filter(|schedule| schedule.status == ScheduleStatus::Completed)
                .count() as i64
        })
        .sum();

    NewSkpRecord {
        dosen_id,
        periode: periode.to_string(),
        total_sessions,
        total_mahasiswa,
        completed_mahasiswa,
        response_rate: PLACEHOLDER_RESPONSE_RATE,
        avg_response_time_hours: PLACEHOLDER_AVG_RESPONSE_HOURS,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportTotals {
    pub total_sessions: i64,
    pub total_mahasiswa: i64,
    pub avg_response_rate: f64,
}

/// Summary row over a whole SKP report page.
pub fn report_totals(records: &[SkpRecordWithDosen]) -> ReportTotals {
    let total_sessions = records.iter().map(|r| r.record.total_sessions).sum();
    let total_mahasiswa = records.iter().map(|r| r.record.total_mahasiswa).sum();
    let avg_response_rate = if records.is_empty() {
        0.0
    } else {
        round_one_decimal(
            records.iter().map(|r| r.record.response_rate).sum::<f64>() / records.len() as f64,
        )
    };
    ReportTotals {
        total_sessions,
        total_mahasiswa,
        avg_response_rate,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
