mod jobs;
mod menus;
mod scrapes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use menuscrape_core::{AppConfig, ProfileSet, SiteProfile};
use menuscrape_scraper::HttpPageLoader;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::jobs::JobStore;
use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub profiles: Arc<ProfileSet>,
    pub jobs: Arc<dyn JobStore>,
    pub loader: HttpPageLoader,
    pub started_at: Instant,
}

impl AppState {
    fn profile(&self, site: &str) -> Result<&SiteProfile, ApiError> {
        self.profiles.get(site).ok_or_else(|| {
            ApiError::new(
                "not_found",
                "Unknown scraper",
                format!("no site profile named '{site}'"),
            )
        })
    }

    fn menu_path(&self, profile: &SiteProfile) -> PathBuf {
        self.config.output_dir.join(&profile.output_file)
    }
}

/// Error body shared by every endpoint: `{success: false, error, message}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    success: bool,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &'static str, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
    /// Seconds since startup.
    uptime: f64,
}

/// `2024-05-01T10-20-30-123Z`: an ISO timestamp safe for file names.
pub(super) fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// JSON response served as a file download.
pub(super) fn attachment<T: Serialize>(filename: &str, body: &T) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    ([(header::CONTENT_DISPOSITION, disposition)], Json(body)).into_response()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/scrapers/jobs", get(jobs::list_jobs))
        .route("/api/v1/scrapers/status/{job_id}", get(jobs::job_status))
        .route("/api/v1/scrapers/{site}/menu", get(menus::get_menu))
        .route("/api/v1/scrapers/{site}/download", get(menus::download_menu))
        .route(
            "/api/v1/scrapers/{site}/scrape-download",
            get(scrapes::scrape_and_download),
        )
        .route("/api/v1/scrapers/{site}/scrape", post(scrapes::start_scrape))
        .route("/api/v1/download/all", get(menus::download_all))
}

pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir)
        .not_found_service(axum::handler::HandlerWithoutStateExt::into_service(not_found));

    Router::new()
        .route("/health", get(health))
        .merge(api_router())
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "OK",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

async fn not_found() -> ApiError {
    ApiError::new("not_found", "Not Found", "Endpoint not found")
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
