use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde::Serialize;
use tokio::sync::Mutex;
use tower::util::ServiceExt;
use uuid::Uuid;

use sibima_admin::backend::{
    Backend, BackendError, BackendResult, BimbinganFilters, StudentFilters,
};
use sibima_admin::config::AppConfig;
use sibima_admin::models::{
    AdvisingSummary, AdvisorDetail, AdvisorWithLoad, Bimbingan, BimbinganForSkp, BimbinganStatus,
    BimbinganWithParties, CountRow, DocumentWithContext, MessageWithSender, MilestoneWithContext,
    NameRef, NewSkpRecord, Schedule, ScheduleStatus, ScheduleWithRequester, SkpRecord,
    SkpRecordWithDosen, StudentDetail, StudentWithAdvising, UpsertUser, User, UserRef, UserRole,
};
use sibima_admin::routes;
use sibima_admin::state::AppState;

/// In-memory stand-in for the hosted data backend. Reads serve seeded
/// rows with the same filter semantics as the real query contract;
/// mutations are recorded for assertions. `fail_reads` simulates an
/// unreachable backend.
#[derive(Default)]
pub struct FakeBackend {
    pub student_count: u64,
    pub advisor_count: u64,
    pub active_bimbingan_count: u64,
    pub completed_bimbingan_count: u64,
    pub completed_sessions_count: u64,

    pub students: Vec<StudentWithAdvising>,
    pub student_details: Vec<StudentDetail>,
    pub advisors: Vec<AdvisorWithLoad>,
    pub advisor_details: Vec<AdvisorDetail>,
    pub bimbingan: Vec<BimbinganWithParties>,
    pub skp_reports: Vec<SkpRecordWithDosen>,
    pub skp_sources: Vec<BimbinganForSkp>,
    pub messages: Vec<MessageWithSender>,
    pub schedules: Vec<ScheduleWithRequester>,
    pub milestones: Vec<MilestoneWithContext>,
    pub documents: Vec<DocumentWithContext>,

    pub fail_reads: bool,

    pub upserted_skp: Mutex<Vec<NewSkpRecord>>,
    pub upserted_users: Mutex<Vec<UpsertUser>>,
    pub deleted_users: Mutex<Vec<Uuid>>,
    pub assigned: Mutex<Vec<(Uuid, Uuid)>>,
}

impl FakeBackend {
    fn read_failure(&self) -> BackendError {
        BackendError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "backend down".to_string(),
        }
    }

    fn check_reads(&self) -> BackendResult<()> {
        if self.fail_reads {
            Err(self.read_failure())
        } else {
            Ok(())
        }
    }

    fn matches_search(user: &User, term: &str) -> bool {
        let needle = term.to_lowercase();
        user.full_name.to_lowercase().contains(&needle)
            || user.nim_nidn.to_lowercase().contains(&needle)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn count_users_by_role(&self, role: UserRole) -> BackendResult<u64> {
        self.check_reads()?;
        Ok(match role {
            UserRole::Student => self.student_count,
            UserRole::Advisor => self.advisor_count,
            _ => 0,
        })
    }

    async fn count_bimbingan_by_status(&self, status: BimbinganStatus) -> BackendResult<u64> {
        self.check_reads()?;
        Ok(match status {
            BimbinganStatus::Active => self.active_bimbingan_count,
            BimbinganStatus::Completed => self.completed_bimbingan_count,
            BimbinganStatus::Cancelled => 0,
        })
    }

    async fn count_schedules_by_status(&self, status: ScheduleStatus) -> BackendResult<u64> {
        self.check_reads()?;
        Ok(match status {
            ScheduleStatus::Completed => self.completed_sessions_count,
            _ => 0,
        })
    }

    async fn list_students(
        &self,
        filters: &StudentFilters,
    ) -> BackendResult<Vec<StudentWithAdvising>> {
        self.check_reads()?;
        Ok(self
            .students
            .iter()
            .filter(|student| {
                filters
                    .search
                    .as_deref()
                    .map_or(true, |term| Self::matches_search(&student.user, term))
            })
            .filter(|student| {
                filters
                    .angkatan
                    .map_or(true, |year| student.user.angkatan == Some(year))
            })
            .cloned()
            .collect())
    }

    async fn get_student(&self, id: Uuid) -> BackendResult<Option<StudentDetail>> {
        self.check_reads()?;
        Ok(self
            .student_details
            .iter()
            .find(|detail| detail.user.id == id)
            .cloned())
    }

    async fn list_advisors(&self, search: Option<&str>) -> BackendResult<Vec<AdvisorWithLoad>> {
        self.check_reads()?;
        Ok(self
            .advisors
            .iter()
            .filter(|advisor| search.map_or(true, |term| Self::matches_search(&advisor.user, term)))
            .cloned()
            .collect())
    }

    async fn get_advisor(&self, id: Uuid) -> BackendResult<Option<AdvisorDetail>> {
        self.check_reads()?;
        Ok(self
            .advisor_details
            .iter()
            .find(|detail| detail.user.id == id)
            .cloned())
    }

    async fn get_advisor_skp(
        &self,
        advisor_id: Uuid,
        periode: &str,
    ) -> BackendResult<Option<SkpRecord>> {
        self.check_reads()?;
        Ok(self
            .skp_reports
            .iter()
            .find(|entry| entry.record.dosen_id == advisor_id && entry.record.periode == periode)
            .map(|entry| entry.record.clone()))
    }

    async fn list_bimbingan(
        &self,
        filters: &BimbinganFilters,
    ) -> BackendResult<Vec<BimbinganWithParties>> {
        self.check_reads()?;
        Ok(self
            .bimbingan
            .iter()
            .filter(|row| filters.status.map_or(true, |status| row.record.status == status))
            .filter(|row| {
                filters
                    .dosen_id
                    .map_or(true, |dosen_id| row.record.dosen_id == dosen_id)
            })
            .cloned()
            .collect())
    }

    async fn assign_bimbingan(
        &self,
        mahasiswa_id: Uuid,
        dosen_id: Uuid,
    ) -> BackendResult<Bimbingan> {
        let mut assigned = self.assigned.lock().await;
        assigned.push((mahasiswa_id, dosen_id));
        Ok(Bimbingan {
            id: Uuid::new_v4(),
            mahasiswa_id,
            dosen_id,
            judul_skripsi: None,
            status: BimbinganStatus::Active,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        })
    }

    async fn list_skp_reports(&self, periode: &str) -> BackendResult<Vec<SkpRecordWithDosen>> {
        self.check_reads()?;
        Ok(self
            .skp_reports
            .iter()
            .filter(|entry| entry.record.periode == periode)
            .cloned()
            .collect())
    }

    async fn bimbingan_for_skp(&self, _dosen_id: Uuid) -> BackendResult<Vec<BimbinganForSkp>> {
        self.check_reads()?;
        Ok(self.skp_sources.clone())
    }

    async fn upsert_skp_record(&self, record: &NewSkpRecord) -> BackendResult<SkpRecord> {
        let mut upserted = self.upserted_skp.lock().await;
        upserted.push(record.clone());
        Ok(SkpRecord {
            id: Uuid::new_v4(),
            dosen_id: record.dosen_id,
            periode: record.periode.clone(),
            total_sessions: record.total_sessions,
            total_mahasiswa: record.total_mahasiswa,
            completed_mahasiswa: record.completed_mahasiswa,
            response_rate: record.response_rate,
            avg_response_time_hours: record.avg_response_time_hours,
            created_at: Utc::now(),
        })
    }

    async fn recent_messages(&self, limit: usize) -> BackendResult<Vec<MessageWithSender>> {
        self.check_reads()?;
        Ok(self.messages.iter().take(limit).cloned().collect())
    }

    async fn recent_schedules(&self, limit: usize) -> BackendResult<Vec<ScheduleWithRequester>> {
        self.check_reads()?;
        Ok(self.schedules.iter().take(limit).cloned().collect())
    }

    async fn list_milestones_with_context(&self) -> BackendResult<Vec<MilestoneWithContext>> {
        self.check_reads()?;
        Ok(self.milestones.clone())
    }

    async fn list_documents(&self) -> BackendResult<Vec<DocumentWithContext>> {
        self.check_reads()?;
        Ok(self.documents.clone())
    }

    async fn upsert_user(&self, user: &UpsertUser) -> BackendResult<User> {
        let mut upserted = self.upserted_users.lock().await;
        upserted.push(user.clone());
        Ok(User {
            id: user.id.unwrap_or_else(Uuid::new_v4),
            nim_nidn: user.nim_nidn.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            phone: user.phone.clone(),
            avatar_url: user.avatar_url.clone(),
            prodi_id: user.prodi_id,
            angkatan: user.angkatan,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn delete_user(&self, id: Uuid) -> BackendResult<()> {
        let mut deleted = self.deleted_users.lock().await;
        deleted.push(id);
        Ok(())
    }
}

pub struct TestApp {
    pub backend: Arc<FakeBackend>,
    router: Router,
}

impl TestApp {
    pub fn new(backend: FakeBackend) -> Self {
        let config = AppConfig {
            backend_url: "http://backend.local".to_string(),
            service_key: "test-service-key".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            cors_allowed_origin: None,
            activity_feed_limit: 10,
            search_debounce_ms: 300,
        };
        let backend = Arc::new(backend);
        let state = AppState::new(backend.clone(), config);
        let router = routes::create_router(state);
        Self { backend, router }
    }

    pub async fn get(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::POST, path, payload).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::PUT, path, payload).await
    }

    pub async fn delete(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(path)
            .body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

// Seed-row builders.

#[allow(dead_code)]
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

#[allow(dead_code)]
pub fn user(role: UserRole, full_name: &str, nim_nidn: &str) -> User {
    User {
        id: Uuid::new_v4(),
        nim_nidn: nim_nidn.to_string(),
        email: format!(
            "{}@kampus.ac.id",
            full_name.to_lowercase().replace(' ', ".")
        ),
        full_name: full_name.to_string(),
        role,
        phone: None,
        avatar_url: None,
        prodi_id: None,
        angkatan: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[allow(dead_code)]
pub fn student_with_records(
    full_name: &str,
    nim: &str,
    statuses: &[BimbinganStatus],
) -> StudentWithAdvising {
    StudentWithAdvising {
        user: user(UserRole::Student, full_name, nim),
        bimbingan: statuses
            .iter()
            .map(|status| AdvisingSummary {
                id: Uuid::new_v4(),
                status: *status,
                judul_skripsi: None,
                dosen: Some(UserRef {
                    id: Uuid::new_v4(),
                    full_name: "Dr. Sari Wijaya".to_string(),
                }),
            })
            .collect(),
    }
}

#[allow(dead_code)]
pub fn advisor_with_load(full_name: &str, nidn: &str, counts: &[i64]) -> AdvisorWithLoad {
    AdvisorWithLoad {
        user: user(UserRole::Advisor, full_name, nidn),
        bimbingan: counts.iter().map(|&count| CountRow { count }).collect(),
    }
}

#[allow(dead_code)]
pub fn advisor_detail(full_name: &str, nidn: &str) -> AdvisorDetail {
    AdvisorDetail {
        user: user(UserRole::Advisor, full_name, nidn),
        bimbingan: Vec::new(),
        skp_records: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn document(file_name: &str, uploader: &str) -> DocumentWithContext {
    DocumentWithContext {
        id: Uuid::new_v4(),
        bimbingan_id: Uuid::new_v4(),
        uploaded_by: Uuid::new_v4(),
        file_name: file_name.to_string(),
        file_url: format!("https://files.local/{file_name}"),
        file_size: 2048,
        version: 1,
        milestone_type: None,
        created_at: Utc::now(),
        uploader: Some(UserRef {
            id: Uuid::new_v4(),
            full_name: uploader.to_string(),
        }),
        bimbingan: None,
    }
}

#[allow(dead_code)]
pub fn message_at(seconds: i64, sender: &str) -> MessageWithSender {
    MessageWithSender {
        id: Uuid::new_v4(),
        bimbingan_id: Uuid::new_v4(),
        sender_id: Uuid::new_v4(),
        content: "halo pak".to_string(),
        is_read: false,
        reply_to_id: None,
        created_at: at(seconds),
        sender: Some(NameRef {
            full_name: sender.to_string(),
        }),
    }
}

#[allow(dead_code)]
pub fn schedule_at(seconds: i64, status: ScheduleStatus, requester: &str) -> ScheduleWithRequester {
    ScheduleWithRequester {
        schedule: Schedule {
            id: Uuid::new_v4(),
            bimbingan_id: Uuid::new_v4(),
            requested_by: Uuid::new_v4(),
            scheduled_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            location: Some("Ruang Dosen 2".to_string()),
            is_mandatory: false,
            status,
            notes: None,
            created_at: at(seconds),
        },
        requester: Some(NameRef {
            full_name: requester.to_string(),
        }),
    }
}

#[allow(dead_code)]
pub fn skp_entry(
    advisor_name: &str,
    nidn: &str,
    periode: &str,
    total_sessions: i64,
    total_mahasiswa: i64,
    completed_mahasiswa: i64,
    response_rate: f64,
) -> SkpRecordWithDosen {
    let dosen_id = Uuid::new_v4();
    SkpRecordWithDosen {
        record: SkpRecord {
            id: Uuid::new_v4(),
            dosen_id,
            periode: periode.to_string(),
            total_sessions,
            total_mahasiswa,
            completed_mahasiswa,
            response_rate,
            avg_response_time_hours: 2.0,
            created_at: Utc::now(),
        },
        dosen: Some(sibima_admin::models::StudentRef {
            id: dosen_id,
            full_name: advisor_name.to_string(),
            nim_nidn: nidn.to_string(),
        }),
    }
}
