use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use menuscrape_core::{CanonicalMenuItem, SiteProfile};
use menuscrape_scraper::{scrape_and_save, RunSettings, SavedMenu, ScraperError};
use serde::{Deserialize, Serialize};

use super::{attachment, file_timestamp, ApiError, AppState};
use crate::jobs::JobRecord;
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeQuery {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ScrapeRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeDownload {
    success: bool,
    scraped_url: String,
    scraped_at: DateTime<Utc>,
    filename: String,
    total_items: usize,
    data: Vec<CanonicalMenuItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeStarted {
    success: bool,
    message: &'static str,
    job_id: String,
    status_endpoint: String,
}

async fn run_scrape(
    state: &AppState,
    profile: &SiteProfile,
    url: &str,
) -> Result<SavedMenu, ScraperError> {
    let settings = RunSettings::from_config(&state.config);
    scrape_and_save(&state.loader, profile, url, &settings, &state.config.output_dir).await
}

fn scrape_failed(err: &ScraperError) -> ApiError {
    ApiError::new("internal_error", "Scraping failed", err.to_string())
}

/// Runs a scrape inside the request and returns the fresh menu as a download.
///
/// The run continues in the background if the request timeout fires first.
pub(super) async fn scrape_and_download(
    State(state): State<AppState>,
    Path(site): Path<String>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ScrapeQuery>,
) -> Result<Response, ApiError> {
    let profile = state.profile(&site)?.clone();
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            ApiError::new(
                "bad_request",
                "URL is required",
                "Please provide a URL as query parameter: ?url=YOUR_URL",
            )
        })?;

    tracing::info!(request_id = %req_id.0, site = %profile.id, %url, "direct scrape requested");
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let run = tokio::spawn({
        let state = state.clone();
        let profile = profile.clone();
        let url = url.clone();
        async move { run_scrape(&state, &profile, &url).await }
    });

    let saved = match tokio::time::timeout(timeout, run).await {
        Err(_) => {
            tracing::warn!(request_id = %req_id.0, site = %profile.id, "direct scrape exceeded request timeout");
            return Err(ApiError::new(
                "timeout",
                "Request timeout",
                "Scraping operation took too long. Try again or use cached data.",
            ));
        }
        Ok(Err(join_err)) => {
            tracing::error!(request_id = %req_id.0, error = %join_err, "scrape task aborted");
            return Err(ApiError::new("internal_error", "Scraping failed", join_err.to_string()));
        }
        Ok(Ok(result)) => result.map_err(|e| scrape_failed(&e))?,
    };

    let data = saved.items;
    let now = Utc::now();
    let filename = format!("{}-{}.json", profile.id, file_timestamp(now));
    tracing::info!(site = %profile.id, count = saved.report.total_items, %filename, "direct scrape finished");
    Ok(attachment(
        &filename,
        &ScrapeDownload {
            success: true,
            scraped_url: url,
            scraped_at: now,
            filename: filename.clone(),
            total_items: data.len(),
            data,
        },
    ))
}

/// Starts a background run and returns its job id immediately.
pub(super) async fn start_scrape(
    State(state): State<AppState>,
    Path(site): Path<String>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<ScrapeRequest>>,
) -> Result<Json<ScrapeStarted>, ApiError> {
    let profile = state.profile(&site)?.clone();
    let url = body
        .and_then(|Json(request)| request.url)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| profile.default_url.clone());

    let record = JobRecord::running(&profile.id, &url);
    let job_id = record.job_id.clone();
    state.jobs.put(record);
    tracing::info!(request_id = %req_id.0, %job_id, site = %profile.id, %url, "background scrape started");

    tokio::spawn(run_job(state.clone(), profile, url, job_id.clone()));

    Ok(Json(ScrapeStarted {
        success: true,
        message: "Scraping started in background",
        status_endpoint: format!("/api/v1/scrapers/status/{job_id}"),
        job_id,
    }))
}

async fn run_job(state: AppState, profile: SiteProfile, url: String, job_id: String) {
    let outcome = run_scrape(&state, &profile, &url).await;
    let Some(record) = state.jobs.get(&job_id) else {
        tracing::warn!(%job_id, "job record vanished before completion");
        return;
    };

    match outcome {
        Ok(saved) => {
            tracing::info!(%job_id, count = saved.report.total_items, "background scrape completed");
            state.jobs.put(record.completed(saved.report));
        }
        Err(err) => {
            tracing::warn!(%job_id, error = %err, "background scrape failed");
            state.jobs.put(record.failed(err.to_string()));
        }
    }
}
