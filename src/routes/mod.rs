use axum::http::HeaderValue;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod activity;
pub mod advising;
pub mod advisors;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod progress;
pub mod reports;
pub mod students;
pub mod users;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| {
                    trimmed
                        .parse::<HeaderValue>()
                        .expect("invalid CORS allowed origin")
                })
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let dashboard_routes = Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/activity", get(dashboard::recent_activity));

    let reports_routes = Router::new()
        .route("/skp", get(reports::list_skp))
        .route("/skp/generate", post(reports::generate_skp))
        .route("/skp/export", get(reports::export_skp));

    Router::new()
        .nest("/api/dashboard", dashboard_routes)
        .route("/api/students", get(students::list_students))
        .route("/api/students/:id", get(students::get_student))
        .route("/api/advisors", get(advisors::list_advisors))
        .route("/api/advisors/:id", get(advisors::get_advisor))
        .route("/api/advisors/:id/skp", get(advisors::get_advisor_skp))
        .route(
            "/api/bimbingan",
            get(advising::list_bimbingan).post(advising::assign_bimbingan),
        )
        .route("/api/progress", get(progress::milestone_progress))
        .route("/api/documents", get(documents::list_documents))
        .route("/api/activity", get(activity::list_activity))
        .route("/api/activity/export", get(activity::export_activity))
        .nest("/api/reports", reports_routes)
        .route("/api/users", put(users::upsert_user))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
