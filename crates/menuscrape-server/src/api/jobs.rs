use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::{ApiError, AppState};
use crate::jobs::{JobRecord, JobStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JobStatusResponse {
    success: bool,
    #[serde(flatten)]
    job: JobRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JobList {
    success: bool,
    total_jobs: usize,
    running_jobs: usize,
    completed_jobs: usize,
    failed_jobs: usize,
    jobs: Vec<JobRecord>,
}

pub(super) async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let job = state.jobs.get(&job_id).ok_or_else(|| {
        ApiError::new(
            "not_found",
            "Job not found",
            "The specified job ID does not exist or has expired.",
        )
    })?;

    let (download_url, elapsed_time, message) = match job.status {
        JobStatus::Completed => (
            Some(format!("/api/v1/scrapers/{}/download", job.scraper)),
            None,
            None,
        ),
        JobStatus::Failed => (None, None, None),
        JobStatus::Running => {
            let elapsed = (Utc::now() - job.start_time).num_seconds().max(0);
            (None, Some(format!("{elapsed}s")), Some("Scraping in progress..."))
        }
    };

    Ok(Json(JobStatusResponse {
        success: true,
        job,
        download_url,
        elapsed_time,
        message,
    }))
}

pub(super) async fn list_jobs(State(state): State<AppState>) -> Json<JobList> {
    let jobs = state.jobs.list();
    let count = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();

    Json(JobList {
        success: true,
        total_jobs: jobs.len(),
        running_jobs: count(JobStatus::Running),
        completed_jobs: count(JobStatus::Completed),
        failed_jobs: count(JobStatus::Failed),
        jobs,
    })
}
