//! Access to the hosted data backend. The [`Backend`] trait is the seam
//! between route handlers and the remote service: each method declares one
//! fixed query shape (filters, ordering, embedded relations) and returns
//! typed rows. The production implementation is [`rest::RestBackend`];
//! tests substitute an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AdvisorDetail, AdvisorWithLoad, Bimbingan, BimbinganForSkp, BimbinganStatus,
    BimbinganWithParties, DocumentWithContext, MessageWithSender, MilestoneWithContext,
    NewSkpRecord, ScheduleStatus, ScheduleWithRequester, SkpRecord, SkpRecordWithDosen,
    StudentDetail, StudentWithAdvising, UpsertUser, User, UserRole,
};

pub mod query;
pub mod rest;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend response missing exact count")]
    MissingCount,
    #[error("row not found")]
    RowNotFound,
}

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Clone, Default)]
pub struct StudentFilters {
    pub search: Option<String>,
    pub angkatan: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct BimbinganFilters {
    pub status: Option<BimbinganStatus>,
    pub dosen_id: Option<Uuid>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn count_users_by_role(&self, role: UserRole) -> BackendResult<u64>;
    async fn count_bimbingan_by_status(&self, status: BimbinganStatus) -> BackendResult<u64>;
    async fn count_schedules_by_status(&self, status: ScheduleStatus) -> BackendResult<u64>;

    async fn list_students(
        &self,
        filters: &StudentFilters,
    ) -> BackendResult<Vec<StudentWithAdvising>>;
    async fn get_student(&self, id: Uuid) -> BackendResult<Option<StudentDetail>>;

    async fn list_advisors(&self, search: Option<&str>) -> BackendResult<Vec<AdvisorWithLoad>>;
    async fn get_advisor(&self, id: Uuid) -> BackendResult<Option<AdvisorDetail>>;
    async fn get_advisor_skp(
        &self,
        advisor_id: Uuid,
        periode: &str,
    ) -> BackendResult<Option<SkpRecord>>;

    async fn list_bimbingan(
        &self,
        filters: &BimbinganFilters,
    ) -> BackendResult<Vec<BimbinganWithParties>>;
    async fn assign_bimbingan(
        &self,
        mahasiswa_id: Uuid,
        dosen_id: Uuid,
    ) -> BackendResult<Bimbingan>;

    async fn list_skp_reports(&self, periode: &str) -> BackendResult<Vec<SkpRecordWithDosen>>;
    async fn bimbingan_for_skp(&self, dosen_id: Uuid) -> BackendResult<Vec<BimbinganForSkp>>;
    async fn upsert_skp_record(&self, record: &NewSkpRecord) -> BackendResult<SkpRecord>;

    async fn recent_messages(&self, limit: usize) -> BackendResult<Vec<MessageWithSender>>;
    async fn recent_schedules(&self, limit: usize) -> BackendResult<Vec<ScheduleWithRequester>>;

    async fn list_milestones_with_context(&self) -> BackendResult<Vec<MilestoneWithContext>>;
    async fn list_documents(&self) -> BackendResult<Vec<DocumentWithContext>>;

    async fn upsert_user(&self, user: &UpsertUser) -> BackendResult<User>;
    async fn delete_user(&self, id: Uuid) -> BackendResult<()>;
}

// Degrade-to-empty policy for reads: list pages render their empty state
// instead of failing when the backend is unreachable. Mutations never go
// through these helpers.

pub fn rows_or_empty<T>(result: BackendResult<Vec<T>>, context: &str) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(error) => {
            tracing::warn!(%context, %error, "read failed; serving empty list");
            Vec::new()
        }
    }
}

pub fn count_or_zero(result: BackendResult<u64>, context: &str) -> u64 {
    match result {
        Ok(count) => count,
        Err(error) => {
            tracing::warn!(%context, %error, "count failed; serving zero");
            0
        }
    }
}

pub fn row_or_none<T>(result: BackendResult<Option<T>>, context: &str) -> Option<T> {
    match result {
        Ok(row) => row,
        Err(error) => {
            tracing::warn!(%context, %error, "read failed; serving none");
            None
        }
    }
}
