use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::app_state::AppState;
use crate::error::VideoGenError;
use crate::videogen::prediction;
use crate::videogen::types::{
    CheckVideoParams, ErrorResponse, PredictionStatus, VideoGenQueuedResponse, VideoGenRequest,
    VideoStatusResponse,
};

/// Start a (mock) video generation and return its prediction id
#[utoipa::path(
    post,
    path = "/generate-video",
    request_body = VideoGenRequest,
    responses(
        (status = 200, description = "Video generation started successfully", body = VideoGenQueuedResponse),
        (status = 500, description = "Malformed request body", body = ErrorResponse),
    ),
    tag = "VideoGen"
)]
pub async fn generate_video(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<VideoGenRequest>, JsonRejection>,
) -> Result<Json<VideoGenQueuedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|e| {
        log::error!("Error generating video: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to start video generation".to_string(),
            }),
        )
    })?;

    if app_state.config.replicate_api_token.is_some() {
        info!("Provider token is configured, but demo mode is active");
    }

    let max_chars = 60;
    let prompt = &request.prompt;
    let truncated_prompt = prompt
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| &prompt[..idx])
        .unwrap_or(prompt);

    let prediction_id = prediction::new_prediction_id();
    info!(
        "Queued mock {} prediction {} for prompt: {}",
        request.mode, prediction_id, truncated_prompt
    );

    Ok(Json(VideoGenQueuedResponse {
        prediction_id,
        status: PredictionStatus::Processing,
    }))
}

/// Check the status of a prediction by id
#[utoipa::path(
    get,
    path = "/check-video",
    params(CheckVideoParams),
    responses(
        (status = 200, description = "Current prediction status", body = VideoStatusResponse),
        (status = 400, description = "Missing prediction ID", body = ErrorResponse),
    ),
    tag = "VideoGen"
)]
pub async fn check_video(
    Query(params): Query<CheckVideoParams>,
) -> Result<Json<VideoStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let id = params.id.filter(|id| !id.is_empty()).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: VideoGenError::MissingPredictionId.to_string(),
            }),
        )
    })?;

    Ok(Json(prediction::derive_status(
        &id,
        Utc::now().timestamp_millis(),
    )))
}
