use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::jobs::{Job, JobStore};
use super::VideoGenClient;
use crate::consts::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};
use crate::error::VideoGenError;
use crate::videogen::types::{GenerationMode, PredictionStatus, VideoGenRequest};

const SUBMIT_FAILED_MESSAGE: &str = "Failed to generate video";
const CHECK_FAILED_MESSAGE: &str = "Failed to check video status";
const PROVIDER_FAILED_MESSAGE: &str = "Video generation failed";

/// Polling policy for one job. The defaults are the fixed production values;
/// tests shrink them.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Submits jobs and drives one status-polling task per job. Tasks share
/// nothing but the job store, which each updates under its own job id only.
#[derive(Clone)]
pub struct JobPoller {
    client: VideoGenClient,
    store: JobStore,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(client: VideoGenClient, store: JobStore) -> Self {
        Self::with_config(client, store, PollerConfig::default())
    }

    pub fn with_config(client: VideoGenClient, store: JobStore, config: PollerConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Create a job, submit it to the provider and begin polling. The job is
    /// visible in the store (as `processing`) before the submission request
    /// goes out; the returned record reflects the submission outcome.
    pub async fn submit(
        &self,
        prompt: String,
        mode: GenerationMode,
        image: Option<String>,
    ) -> Job {
        let job = Job::new(prompt.clone());
        let job_id = job.id.clone();
        self.store.insert(job.clone()).await;

        let request = VideoGenRequest {
            prompt,
            mode,
            image,
        };

        match self.client.generate_video(&request).await {
            Ok(queued) => {
                info!(
                    "Job {} queued as prediction {}",
                    job_id, queued.prediction_id
                );
                self.store
                    .set_prediction_id(&job_id, &queued.prediction_id)
                    .await;
                self.spawn_poll_loop(job_id.clone(), queued.prediction_id);
            }
            Err(VideoGenError::ProviderError(message)) => {
                warn!("Submission rejected for job {job_id}: {message}");
                self.store.mark_failed(&job_id, &message).await;
            }
            Err(e) => {
                warn!("Submission failed for job {job_id}: {e}");
                self.store.mark_failed(&job_id, SUBMIT_FAILED_MESSAGE).await;
            }
        }

        self.store.get(&job_id).await.unwrap_or(job)
    }

    /// Spawn the polling task for an already-submitted prediction. The
    /// returned handle can abort the loop; nothing in the demo does, as
    /// there is no user-facing cancellation.
    pub fn spawn_poll_loop(&self, job_id: String, prediction_id: String) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move { poller.run_poll_loop(&job_id, &prediction_id).await })
    }

    async fn run_poll_loop(&self, job_id: &str, prediction_id: &str) {
        let mut attempts = 0u32;

        loop {
            if attempts >= self.config.max_attempts {
                warn!("Job {job_id} exhausted {attempts} polling attempts");
                self.store
                    .mark_failed(job_id, &VideoGenError::Timeout.to_string())
                    .await;
                return;
            }

            match self.client.check_video(prediction_id).await {
                Ok(status) => match (status.status, status.video_url) {
                    (PredictionStatus::Succeeded, Some(video_url)) => {
                        info!("Job {job_id} completed: {video_url}");
                        self.store.mark_completed(job_id, &video_url).await;
                        return;
                    }
                    (PredictionStatus::Failed, _) => {
                        let error = status
                            .error
                            .unwrap_or_else(|| PROVIDER_FAILED_MESSAGE.to_string());
                        warn!("Job {job_id} failed: {error}");
                        self.store.mark_failed(job_id, &error).await;
                        return;
                    }
                    // Still pending: `processing`, a status we do not
                    // recognize, or `succeeded` without a result yet.
                    _ => {
                        attempts += 1;
                        if attempts % 10 == 0 {
                            info!("Job {job_id} still in progress after {attempts} checks");
                        }
                    }
                },
                Err(e) => {
                    warn!("Status check failed for job {job_id}: {e}");
                    self.store.mark_failed(job_id, CHECK_FAILED_MESSAGE).await;
                    return;
                }
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::config::AppConfig;
    use crate::consts::SAMPLE_VIDEO_URL;
    use crate::videogen::types::CheckVideoParams;
    use crate::videogen::videogen_router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use reqwest::Url;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use utoipa_axum::router::OpenApiRouter;

    use crate::client::jobs::JobStatus;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn poller_for(addr: SocketAddr, config: PollerConfig) -> JobPoller {
        let base_url = Url::parse(&format!("http://{addr}")).unwrap();
        JobPoller::with_config(VideoGenClient::new(base_url), JobStore::new(), config)
    }

    fn fast_config() -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        }
    }

    async fn wait_for_terminal(store: &JobStore, id: &str) -> Job {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if let Some(job) = store.get(id).await {
                    if job.status.is_terminal() {
                        return job;
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("job did not reach a terminal state in time")
    }

    fn mock_submission_route() -> Router {
        Router::new().route(
            "/generate-video",
            post(|| async {
                Json(json!({ "predictionId": "mock_1_abcdef123", "status": "processing" }))
            }),
        )
    }

    #[tokio::test]
    async fn succeeded_with_url_completes_the_job() {
        let app = mock_submission_route().route(
            "/check-video",
            get(|| async {
                Json(json!({ "status": "succeeded", "videoUrl": "https://cdn.example/clip.mp4" }))
            }),
        );
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;
        assert_eq!(job.prediction_id.as_deref(), Some("mock_1_abcdef123"));

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.video_url.as_deref(), Some("https://cdn.example/clip.mp4"));
        assert!(done.error.is_none());
    }

    #[tokio::test]
    async fn provider_failure_carries_its_message() {
        let app = mock_submission_route().route(
            "/check-video",
            get(|| async { Json(json!({ "status": "failed", "error": "NSFW content detected" })) }),
        );
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("something lurid".to_string(), GenerationMode::TextToVideo, None)
            .await;

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.status, JobStatus::Failed);
        assert_eq!(done.error.as_deref(), Some("NSFW content detected"));
        assert!(done.video_url.is_none());
    }

    #[tokio::test]
    async fn provider_failure_without_message_gets_the_default() {
        let app = mock_submission_route().route(
            "/check-video",
            get(|| async { Json(json!({ "status": "failed" })) }),
        );
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.error.as_deref(), Some("Video generation failed"));
    }

    #[tokio::test]
    async fn attempt_bound_fails_with_timeout_and_stops_polling() {
        let checks = Arc::new(AtomicU32::new(0));
        let counter = checks.clone();
        let app = mock_submission_route().route(
            "/check-video",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "status": "processing" }))
                }
            }),
        );
        let config = PollerConfig {
            interval: Duration::from_millis(5),
            max_attempts: 3,
        };
        let poller = poller_for(serve(app).await, config);

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.status, JobStatus::Failed);
        assert_eq!(
            done.error.as_deref(),
            Some("Timeout: Video generation took too long")
        );
        assert_eq!(checks.load(Ordering::SeqCst), 3);

        // Terminal means terminal: no further checks go out.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(checks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unknown_statuses_keep_polling_until_the_bound() {
        let app = mock_submission_route().route(
            "/check-video",
            get(|| async { Json(json!({ "status": "booting" })) }),
        );
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(
            done.error.as_deref(),
            Some("Timeout: Video generation took too long")
        );
    }

    #[tokio::test]
    async fn unparseable_status_response_is_a_terminal_failure() {
        let app = mock_submission_route()
            .route("/check-video", get(|| async { "not json at all" }));
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.status, JobStatus::Failed);
        assert_eq!(done.error.as_deref(), Some("Failed to check video status"));
    }

    #[tokio::test]
    async fn submission_transport_failure_fails_the_job() {
        // Bind then drop, so the port is very likely unoccupied.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let poller = poller_for(addr, fast_config());
        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("Failed to generate video"));
        assert!(job.prediction_id.is_none());
    }

    #[tokio::test]
    async fn submission_error_response_carries_the_server_message() {
        let app = Router::new().route(
            "/generate-video",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "quota exceeded" })),
                )
            }),
        );
        let poller = poller_for(serve(app).await, fast_config());

        let job = poller
            .submit("a sunset".to_string(), GenerationMode::TextToVideo, None)
            .await;

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_jobs_do_not_cross_contaminate() {
        let submissions = Arc::new(AtomicU32::new(0));
        let counter = submissions.clone();
        let app = Router::new()
            .route(
                "/generate-video",
                post(move || {
                    let counter = counter.clone();
                    async move {
                        let n = counter.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "predictionId": format!("mock_1_pred{n}"), "status": "processing" }))
                    }
                }),
            )
            .route(
                "/check-video",
                get(|Query(params): Query<CheckVideoParams>| async move {
                    let id = params.id.unwrap_or_default();
                    Json(json!({
                        "status": "succeeded",
                        "videoUrl": format!("https://cdn.example/{id}.mp4"),
                    }))
                }),
            );
        let poller = poller_for(serve(app).await, fast_config());

        let (first, second) = tokio::join!(
            poller.submit("first prompt".to_string(), GenerationMode::TextToVideo, None),
            poller.submit("second prompt".to_string(), GenerationMode::TextToVideo, None),
        );
        assert_ne!(first.id, second.id);

        let first_done = wait_for_terminal(poller.store(), &first.id).await;
        let second_done = wait_for_terminal(poller.store(), &second.id).await;

        assert_eq!(first_done.status, JobStatus::Completed);
        assert_eq!(second_done.status, JobStatus::Completed);
        assert_eq!(first_done.prompt, "first prompt");
        assert_eq!(second_done.prompt, "second prompt");

        let first_pred = first_done.prediction_id.unwrap();
        let second_pred = second_done.prediction_id.unwrap();
        assert_ne!(first_pred, second_pred);
        assert_eq!(
            first_done.video_url.as_deref(),
            Some(format!("https://cdn.example/{first_pred}.mp4").as_str())
        );
        assert_eq!(
            second_done.video_url.as_deref(),
            Some(format!("https://cdn.example/{second_pred}.mp4").as_str())
        );
    }

    /// End to end against the real mock provider: submission, a handful of
    /// pending polls while the 5 s generation window elapses, then success
    /// with the fixed sample video.
    #[tokio::test]
    async fn real_mock_provider_round_trip() {
        let state = Arc::new(AppState::new(AppConfig::default()));
        let (app, _api) = OpenApiRouter::new()
            .merge(videogen_router(state))
            .split_for_parts();
        let addr = serve(app).await;

        let config = PollerConfig {
            interval: Duration::from_millis(200),
            max_attempts: 60,
        };
        let poller = poller_for(addr, config);

        let job = poller
            .submit(
                "a serene ocean sunset".to_string(),
                GenerationMode::TextToVideo,
                None,
            )
            .await;
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job
            .prediction_id
            .as_deref()
            .unwrap()
            .starts_with("mock_"));

        let done = wait_for_terminal(poller.store(), &job.id).await;
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.video_url.as_deref(), Some(SAMPLE_VIDEO_URL.as_str()));
        assert!(done.error.is_none());
    }
}
