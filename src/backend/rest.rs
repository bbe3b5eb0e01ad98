//! Production [`Backend`] implementation over the hosted backend's REST
//! interface. Every relation the dashboard needs is declared as a nested
//! `select=` shape so each page load stays a single round trip per root
//! entity.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{
    AdvisorDetail, AdvisorWithLoad, Bimbingan, BimbinganForSkp, BimbinganStatus,
    BimbinganWithParties, DocumentWithContext, MessageWithSender, MilestoneWithContext,
    NewSkpRecord, ScheduleStatus, ScheduleWithRequester, SkpRecord, SkpRecordWithDosen,
    StudentDetail, StudentWithAdvising, UpsertUser, User, UserRole,
};

use super::query::{parse_content_range, OrderDirection, SelectQuery};
use super::{Backend, BackendError, BackendResult, BimbinganFilters, StudentFilters};

const USER_SEARCH_COLUMNS: [&str; 2] = ["full_name", "nim_nidn"];

const STUDENT_LIST_SELECT: &str =
    "*,bimbingan:bimbingan!mahasiswa_id(id,status,judul_skripsi,dosen:dosen_id(id,full_name))";
const STUDENT_DETAIL_SELECT: &str =
    "*,bimbingan:bimbingan!mahasiswa_id(*,dosen:dosen_id(*),milestones(*),schedules(*))";
const ADVISOR_LIST_SELECT: &str = "*,bimbingan:bimbingan!dosen_id(count)";
const ADVISOR_DETAIL_SELECT: &str =
    "*,bimbingan:bimbingan!dosen_id(*,mahasiswa:mahasiswa_id(*)),skp_records(*)";
const BIMBINGAN_LIST_SELECT: &str = "*,mahasiswa:mahasiswa_id(*),dosen:dosen_id(*)";
const SKP_REPORT_SELECT: &str = "*,dosen:dosen_id(id,full_name,nim_nidn)";
const SKP_SOURCE_SELECT: &str = "id,status,schedules(status),messages(sender_id,created_at,is_read)";
const MESSAGE_FEED_SELECT: &str = "*,sender:sender_id(full_name)";
const SCHEDULE_FEED_SELECT: &str = "*,requester:requested_by(full_name)";
const MILESTONE_CONTEXT_SELECT: &str = "*,bimbingan:bimbingan_id(id,judul_skripsi,\
     mahasiswa:mahasiswa_id(id,full_name,nim_nidn),dosen:dosen_id(id,full_name))";
const DOCUMENT_CONTEXT_SELECT: &str =
    "*,uploader:uploaded_by(id,full_name),bimbingan:bimbingan_id(mahasiswa:mahasiswa_id(full_name))";

pub struct RestBackend {
    client: Client,
    base: Url,
    headers: HeaderMap,
}

impl RestBackend {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&format!("{}/", config.backend_url))?;
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.service_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.service_key))?,
        );
        Ok(Self {
            client: Client::new(),
            base,
            headers,
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.headers.clone())
    }

    fn table_url(&self, table: &str) -> BackendResult<Url> {
        Ok(self.base.join(&format!("rest/v1/{table}"))?)
    }

    async fn ensure_success(response: Response) -> BackendResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status { status, body })
    }

    async fn rows<T: DeserializeOwned>(&self, query: SelectQuery) -> BackendResult<Vec<T>> {
        let url = query.url(&self.base)?;
        let response = self.request(Method::GET, url).send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn maybe_single<T: DeserializeOwned>(
        &self,
        query: SelectQuery,
    ) -> BackendResult<Option<T>> {
        let mut rows: Vec<T> = self.rows(query.limit(1)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Exact row count without fetching rows: a HEAD request carrying the
    /// count preference, answered through the content-range header.
    async fn count(&self, query: SelectQuery) -> BackendResult<u64> {
        let url = query.url(&self.base)?;
        let response = self
            .request(Method::HEAD, url)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or(BackendError::MissingCount)
    }

    async fn insert_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &Value,
    ) -> BackendResult<T> {
        let url = self.table_url(table)?;
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Self::first_returned_row(response).await
    }

    async fn upsert_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        on_conflict: Option<&str>,
        body: &Value,
    ) -> BackendResult<T> {
        let mut url = self.table_url(table)?;
        if let Some(columns) = on_conflict {
            url.query_pairs_mut().append_pair("on_conflict", columns);
        }
        let response = self
            .request(Method::POST, url)
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .json(body)
            .send()
            .await?;
        Self::first_returned_row(response).await
    }

    async fn first_returned_row<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        let mut rows: Vec<T> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(BackendError::RowNotFound);
        }
        Ok(rows.swap_remove(0))
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn count_users_by_role(&self, role: UserRole) -> BackendResult<u64> {
        self.count(SelectQuery::table("users").eq("role", role.as_str()))
            .await
    }

    async fn count_bimbingan_by_status(&self, status: BimbinganStatus) -> BackendResult<u64> {
        self.count(SelectQuery::table("bimbingan").eq("status", status.as_str()))
            .await
    }

    async fn count_schedules_by_status(&self, status: ScheduleStatus) -> BackendResult<u64> {
        self.count(SelectQuery::table("schedules").eq("status", status.as_str()))
            .await
    }

    async fn list_students(
        &self,
        filters: &StudentFilters,
    ) -> BackendResult<Vec<StudentWithAdvising>> {
        let mut query = SelectQuery::table("users")
            .select(STUDENT_LIST_SELECT)
            .eq("role", UserRole::Student.as_str())
            .order("full_name", OrderDirection::Ascending);
        if let Some(search) = filters.search.as_deref() {
            query = query.search(&USER_SEARCH_COLUMNS, search);
        }
        if let Some(angkatan) = filters.angkatan {
            query = query.eq("angkatan", angkatan.to_string());
        }
        self.rows(query).await
    }

    async fn get_student(&self, id: Uuid) -> BackendResult<Option<StudentDetail>> {
        self.maybe_single(
            SelectQuery::table("users")
                .select(STUDENT_DETAIL_SELECT)
                .eq("id", id.to_string()),
        )
        .await
    }

    async fn list_advisors(&self, search: Option<&str>) -> BackendResult<Vec<AdvisorWithLoad>> {
        let mut query = SelectQuery::table("users")
            .select(ADVISOR_LIST_SELECT)
            .eq("role", UserRole::Advisor.as_str())
            .order("full_name", OrderDirection::Ascending);
        if let Some(search) = search {
            query = query.search(&USER_SEARCH_COLUMNS, search);
        }
        self.rows(query).await
    }

    async fn get_advisor(&self, id: Uuid) -> BackendResult<Option<AdvisorDetail>> {
        self.maybe_single(
            SelectQuery::table("users")
                .select(ADVISOR_DETAIL_SELECT)
                .eq("id", id.to_string()),
        )
        .await
    }

    async fn get_advisor_skp(
        &self,
        advisor_id: Uuid,
        periode: &str,
    ) -> BackendResult<Option<SkpRecord>> {
        self.maybe_single(
            SelectQuery::table("skp_records")
                .eq("dosen_id", advisor_id.to_string())
                .eq("periode", periode),
        )
        .await
    }

    async fn list_bimbingan(
        &self,
        filters: &BimbinganFilters,
    ) -> BackendResult<Vec<BimbinganWithParties>> {
        let mut query = SelectQuery::table("bimbingan")
            .select(BIMBINGAN_LIST_SELECT)
            .order("created_at", OrderDirection::Descending);
        if let Some(status) = filters.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(dosen_id) = filters.dosen_id {
            query = query.eq("dosen_id", dosen_id.to_string());
        }
        self.rows(query).await
    }

    async fn assign_bimbingan(
        &self,
        mahasiswa_id: Uuid,
        dosen_id: Uuid,
    ) -> BackendResult<Bimbingan> {
        let body = serde_json::json!({
            "mahasiswa_id": mahasiswa_id,
            "dosen_id": dosen_id,
            "status": BimbinganStatus::Active.as_str(),
        });
        self.insert_returning("bimbingan", &body).await
    }

    async fn list_skp_reports(&self, periode: &str) -> BackendResult<Vec<SkpRecordWithDosen>> {
        self.rows(
            SelectQuery::table("skp_records")
                .select(SKP_REPORT_SELECT)
                .eq("periode", periode)
                .order("total_sessions", OrderDirection::Descending),
        )
        .await
    }

    async fn bimbingan_for_skp(&self, dosen_id: Uuid) -> BackendResult<Vec<BimbinganForSkp>> {
        self.rows(
            SelectQuery::table("bimbingan")
                .select(SKP_SOURCE_SELECT)
                .eq("dosen_id", dosen_id.to_string()),
        )
        .await
    }

    async fn upsert_skp_record(&self, record: &NewSkpRecord) -> BackendResult<SkpRecord> {
        let body = serde_json::to_value(record)?;
        self.upsert_returning("skp_records", Some("dosen_id,periode"), &body)
            .await
    }

    async fn recent_messages(&self, limit: usize) -> BackendResult<Vec<MessageWithSender>> {
        self.rows(
            SelectQuery::table("messages")
                .select(MESSAGE_FEED_SELECT)
                .order("created_at", OrderDirection::Descending)
                .limit(limit),
        )
        .await
    }

    async fn recent_schedules(&self, limit: usize) -> BackendResult<Vec<ScheduleWithRequester>> {
        self.rows(
            SelectQuery::table("schedules")
                .select(SCHEDULE_FEED_SELECT)
                .order("created_at", OrderDirection::Descending)
                .limit(limit),
        )
        .await
    }

    async fn list_milestones_with_context(&self) -> BackendResult<Vec<MilestoneWithContext>> {
        self.rows(
            SelectQuery::table("milestones")
                .select(MILESTONE_CONTEXT_SELECT)
                .order("updated_at", OrderDirection::Descending),
        )
        .await
    }

    async fn list_documents(&self) -> BackendResult<Vec<DocumentWithContext>> {
        self.rows(
            SelectQuery::table("documents")
                .select(DOCUMENT_CONTEXT_SELECT)
                .order("created_at", OrderDirection::Descending),
        )
        .await
    }

    async fn upsert_user(&self, user: &UpsertUser) -> BackendResult<User> {
        let mut body = serde_json::to_value(user)?;
        if let Value::Object(fields) = &mut body {
            fields.insert(
                "updated_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }
        self.upsert_returning("users", None, &body).await
    }

    async fn delete_user(&self, id: Uuid) -> BackendResult<()> {
        let mut url = self.table_url("users")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"));
        let response = self.request(Method::DELETE, url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
