//! Background scrape job registry.
//!
//! One store per server process, shared through [`AppState`](crate::api::AppState).
//! Each job has a single writer (the task running it), so whole-record
//! `put` is the only update primitive.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use menuscrape_scraper::PipelineReport;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    pub status: JobStatus,
    /// Site profile id the job runs.
    pub scraper: String,
    pub url: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PipelineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    #[must_use]
    pub fn running(site: &str, url: &str) -> Self {
        Self {
            job_id: format!("{site}_{}", Uuid::new_v4().simple()),
            status: JobStatus::Running,
            scraper: site.to_string(),
            url: url.to_string(),
            start_time: Utc::now(),
            completed_time: None,
            result: None,
            error: None,
        }
    }

    #[must_use]
    pub fn completed(self, report: PipelineReport) -> Self {
        Self {
            status: JobStatus::Completed,
            completed_time: Some(Utc::now()),
            result: Some(report),
            ..self
        }
    }

    #[must_use]
    pub fn failed(self, message: String) -> Self {
        Self {
            status: JobStatus::Failed,
            completed_time: Some(Utc::now()),
            error: Some(message),
            ..self
        }
    }
}

/// Job registry operations. Each call is atomic with respect to the others.
pub trait JobStore: Send + Sync {
    /// Inserts or replaces the record under its `job_id`.
    fn put(&self, record: JobRecord);

    fn get(&self, job_id: &str) -> Option<JobRecord>;

    /// All records, oldest first.
    fn list(&self) -> Vec<JobRecord>;
}

/// Process-local store; records live until the server exits.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl InMemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryJobStore {
    fn put(&self, record: JobRecord) {
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.job_id.clone(), record);
    }

    fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_id)
            .cloned()
    }

    fn list(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.job_id.cmp(&b.job_id)));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_latest_record() {
        let store = InMemoryJobStore::new();
        let record = JobRecord::running("uber", "https://store.example/");
        let id = record.job_id.clone();
        store.put(record.clone());

        assert_eq!(store.get(&id).unwrap().status, JobStatus::Running);

        store.put(record.failed("page never loaded".to_string()));
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error.as_deref(), Some("page never loaded"));
        assert!(stored.completed_time.is_some());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn unknown_job_is_none() {
        assert!(InMemoryJobStore::new().get("uber_missing").is_none());
    }

    #[test]
    fn job_ids_carry_the_site_and_are_unique() {
        let a = JobRecord::running("ilcaminetto", "http://orders.example/");
        let b = JobRecord::running("ilcaminetto", "http://orders.example/");
        assert!(a.job_id.starts_with("ilcaminetto_"));
        assert_ne!(a.job_id, b.job_id);
    }

    #[test]
    fn running_record_serializes_without_terminal_fields() {
        let record = JobRecord::running("uber", "https://store.example/");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["scraper"], "uber");
        assert!(json.get("jobId").is_some());
        assert!(json.get("completedTime").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn concurrent_writers_on_distinct_keys_all_land() {
        let store = std::sync::Arc::new(InMemoryJobStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || store.put(JobRecord::running("uber", "u")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list().len(), 8);
    }
}
