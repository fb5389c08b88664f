use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::RwLock;

/// Client-side lifecycle of one generation request. `Processing` moves to
/// exactly one of the terminal states and never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Client-side record of one generation request. Lives in the [`JobStore`]
/// for the rest of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub prompt: String,
    /// Provider identifier; set once submission succeeds, the polling key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Timestamp-based id with a process-wide sequence suffix, so two jobs
/// created in the same millisecond still get distinct ids.
fn next_job_id(created_at: DateTime<Utc>) -> String {
    let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", created_at.timestamp_millis(), seq)
}

impl Job {
    pub fn new(prompt: String) -> Self {
        let created_at = Utc::now();
        Self {
            id: next_job_id(created_at),
            prompt,
            prediction_id: None,
            status: JobStatus::Processing,
            video_url: None,
            error: None,
            created_at,
        }
    }
}

/// In-memory map of jobs by id. Mutations replace one record wholesale, so
/// readers always observe a consistent record, and transitions out of a
/// terminal state are refused.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }

    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// All jobs, newest first, the order a job list renders them in.
    pub async fn list(&self) -> Vec<Job> {
        let jobs = self.jobs.read().await;
        let mut jobs: Vec<Job> = jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        jobs
    }

    pub async fn set_prediction_id(&self, id: &str, prediction_id: &str) -> Option<Job> {
        self.update_if_active(id, |job| Job {
            prediction_id: Some(prediction_id.to_string()),
            ..job.clone()
        })
        .await
    }

    pub async fn mark_completed(&self, id: &str, video_url: &str) -> Option<Job> {
        self.update_if_active(id, |job| Job {
            status: JobStatus::Completed,
            video_url: Some(video_url.to_string()),
            ..job.clone()
        })
        .await
    }

    pub async fn mark_failed(&self, id: &str, error: &str) -> Option<Job> {
        self.update_if_active(id, |job| Job {
            status: JobStatus::Failed,
            error: Some(error.to_string()),
            ..job.clone()
        })
        .await
    }

    /// Replace-one-record update. A job already in a terminal state is left
    /// untouched, which keeps the status machine monotonic.
    async fn update_if_active<F>(&self, id: &str, build: F) -> Option<Job>
    where
        F: FnOnce(&Job) -> Job,
    {
        let mut jobs = self.jobs.write().await;
        let current = jobs.get(id)?;
        if current.status.is_terminal() {
            return Some(current.clone());
        }
        let updated = build(current);
        jobs.insert(id.to_string(), updated.clone());
        Some(updated)
    }
}
