//! Typed projections of the hosted backend's rows, including the nested
//! shapes returned by embedded-relation selects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "mahasiswa")]
    Student,
    #[serde(rename = "dosen")]
    Advisor,
    #[serde(rename = "admin_tu")]
    AdminStaff,
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "mahasiswa",
            UserRole::Advisor => "dosen",
            UserRole::AdminStaff => "admin_tu",
            UserRole::SuperAdmin => "super_admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BimbinganStatus {
    Active,
    Completed,
    Cancelled,
}

impl BimbinganStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BimbinganStatus::Active => "active",
            BimbinganStatus::Completed => "completed",
            BimbinganStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Revision,
    Approved,
}

/// The fixed thesis-milestone sequence, in timeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    Proposal,
    Bab1,
    Bab2,
    Bab3,
    Bab4,
    Bab5,
    Sidang,
}

pub const MILESTONE_SEQUENCE: [MilestoneKind; 7] = [
    MilestoneKind::Proposal,
    MilestoneKind::Bab1,
    MilestoneKind::Bab2,
    MilestoneKind::Bab3,
    MilestoneKind::Bab4,
    MilestoneKind::Bab5,
    MilestoneKind::Sidang,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Approved => "approved",
            ScheduleStatus::Rejected => "rejected",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nim_nidn: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub prodi_id: Option<i32>,
    #[serde(default)]
    pub angkatan: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bimbingan {
    pub id: Uuid,
    pub mahasiswa_id: Uuid,
    pub dosen_id: Uuid,
    #[serde(default)]
    pub judul_skripsi: Option<String>,
    pub status: BimbinganStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub bimbingan_id: Uuid,
    pub milestone_type: MilestoneKind,
    pub status: MilestoneStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub bimbingan_id: Uuid,
    pub requested_by: Uuid,
    pub scheduled_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    pub is_mandatory: bool,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkpRecord {
    pub id: Uuid,
    pub dosen_id: Uuid,
    pub periode: String,
    pub total_sessions: i64,
    pub total_mahasiswa: i64,
    pub completed_mahasiswa: i64,
    pub response_rate: f64,
    pub avg_response_time_hours: f64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Embedded-relation shapes. Each struct mirrors one declared `select=` shape;
// only the columns named in the select are present.
// ---------------------------------------------------------------------------

/// `(full_name)` — the lightest person embed, used by the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRef {
    pub full_name: String,
}

/// `(id, full_name)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub full_name: String,
}

/// `(id, full_name, nim_nidn)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: Uuid,
    pub full_name: String,
    pub nim_nidn: String,
}

/// Relation-count embed: the backend answers `relation(count)` with a
/// single-element array holding the count instead of the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountRow {
    pub count: i64,
}

/// Advising summary embedded under a student list row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisingSummary {
    pub id: Uuid,
    pub status: BimbinganStatus,
    #[serde(default)]
    pub judul_skripsi: Option<String>,
    #[serde(default)]
    pub dosen: Option<UserRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentWithAdvising {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub bimbingan: Vec<AdvisingSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BimbinganFull {
    #[serde(flatten)]
    pub record: Bimbingan,
    #[serde(default)]
    pub dosen: Option<User>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub bimbingan: Vec<BimbinganFull>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorWithLoad {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub bimbingan: Vec<CountRow>,
}

impl AdvisorWithLoad {
    pub fn advising_count(&self) -> i64 {
        self.bimbingan.first().map(|row| row.count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BimbinganWithStudent {
    #[serde(flatten)]
    pub record: Bimbingan,
    #[serde(default)]
    pub mahasiswa: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub bimbingan: Vec<BimbinganWithStudent>,
    #[serde(default)]
    pub skp_records: Vec<SkpRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BimbinganWithParties {
    #[serde(flatten)]
    pub record: Bimbingan,
    #[serde(default)]
    pub mahasiswa: Option<User>,
    #[serde(default)]
    pub dosen: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneBimbingan {
    pub id: Uuid,
    #[serde(default)]
    pub judul_skripsi: Option<String>,
    #[serde(default)]
    pub mahasiswa: Option<StudentRef>,
    #[serde(default)]
    pub dosen: Option<UserRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneWithContext {
    #[serde(flatten)]
    pub milestone: Milestone,
    #[serde(default)]
    pub bimbingan: Option<MilestoneBimbingan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBimbingan {
    #[serde(default)]
    pub mahasiswa: Option<NameRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWithContext {
    pub id: Uuid,
    pub bimbingan_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub version: i32,
    #[serde(default)]
    pub milestone_type: Option<MilestoneKind>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub uploader: Option<UserRef>,
    #[serde(default)]
    pub bimbingan: Option<DocumentBimbingan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub bimbingan_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    #[serde(default)]
    pub reply_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sender: Option<NameRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWithRequester {
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub requester: Option<NameRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkpRecordWithDosen {
    #[serde(flatten)]
    pub record: SkpRecord,
    #[serde(default)]
    pub dosen: Option<StudentRef>,
}

/// Slim advising shape used when generating an advisor's SKP report:
/// record status plus the schedule statuses and message metadata needed
/// for the session and response counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BimbinganForSkp {
    pub id: Uuid,
    pub status: BimbinganStatus,
    #[serde(default)]
    pub schedules: Vec<ScheduleStatusRow>,
    #[serde(default)]
    pub messages: Vec<MessageMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStatusRow {
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMeta {
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Fields accepted by the admin user upsert. `id` is omitted on create and
/// the backend keys the upsert on it when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub nim_nidn: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prodi_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angkatan: Option<i32>,
}

/// Counter fields written when upserting an advisor's SKP report row,
/// keyed on `(dosen_id, periode)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkpRecord {
    pub dosen_id: Uuid,
    pub periode: String,
    pub total_sessions: i64,
    pub total_mahasiswa: i64,
    pub completed_mahasiswa: i64,
    pub response_rate: f64,
    pub avg_response_time_hours: f64,
}
