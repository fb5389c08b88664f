//! Client side of the agent: a thin HTTP client for the two endpoints, the
//! session-scoped job store, and the per-job polling loop.

pub mod jobs;
pub mod poller;

use reqwest::Url;

use crate::error::VideoGenError;
use crate::videogen::types::{
    ErrorResponse, VideoGenQueuedResponse, VideoGenRequest, VideoStatusResponse,
};

pub use jobs::{Job, JobStatus, JobStore};
pub use poller::{JobPoller, PollerConfig};

/// HTTP client for the video generation API. No per-request timeouts: the
/// attempt bound in the poller is the only clock that gives up on a job.
#[derive(Clone)]
pub struct VideoGenClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl VideoGenClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Submit a generation request, returning the queued prediction.
    pub async fn generate_video(
        &self,
        request: &VideoGenRequest,
    ) -> Result<VideoGenQueuedResponse, VideoGenError> {
        let response = self
            .http_client
            .post(self.endpoint("generate-video"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                VideoGenError::NetworkError(format!("Failed to submit generation request: {e}"))
            })?;

        if !response.status().is_success() {
            let error = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VideoGenError::ProviderError(error));
        }

        response.json().await.map_err(|e| {
            VideoGenError::NetworkError(format!("Failed to parse generation response: {e}"))
        })
    }

    /// Fetch the current status of a prediction.
    pub async fn check_video(
        &self,
        prediction_id: &str,
    ) -> Result<VideoStatusResponse, VideoGenError> {
        let response = self
            .http_client
            .get(self.endpoint("check-video"))
            .query(&[("id", prediction_id)])
            .send()
            .await
            .map_err(|e| {
                VideoGenError::NetworkError(format!("Failed to check prediction status: {e}"))
            })?;

        if !response.status().is_success() {
            let error = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VideoGenError::ProviderError(error));
        }

        response.json().await.map_err(|e| {
            VideoGenError::NetworkError(format!("Failed to parse status response: {e}"))
        })
    }
}
