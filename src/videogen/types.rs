use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /generate-video`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoGenRequest {
    /// Free-text description of the video (or of the motion, for
    /// image-to-video). Emptiness is the caller's concern.
    pub prompt: String,
    #[serde(rename = "type")]
    pub mode: GenerationMode,
    /// Optional source image as a base64 data URI.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationMode {
    TextToVideo,
    ImageToVideo,
}

/// Provider-side status of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionStatus {
    Processing,
    Succeeded,
    Failed,
    /// Any status string we do not recognize. Never produced by this agent;
    /// the client keeps polling when it sees one.
    #[serde(other)]
    Unknown,
}

/// Body of a successful `POST /generate-video` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenQueuedResponse {
    pub prediction_id: String,
    pub status: PredictionStatus,
}

/// Body of a successful `GET /check-video` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatusResponse {
    pub status: PredictionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic error body for both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters of `GET /check-video`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckVideoParams {
    /// Prediction id returned by `POST /generate-video`.
    pub id: Option<String>,
}
