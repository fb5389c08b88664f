//! Mock provider simulation. A real deployment would create and query
//! provider predictions over HTTP; here the prediction id itself encodes its
//! creation time, so status can be derived without any stored state.

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};

use crate::consts::{
    MOCK_GENERATION_DURATION, MOCK_PREDICTION_PREFIX, MOCK_SUFFIX_LEN, SAMPLE_VIDEO_URL,
};
use crate::videogen::types::{PredictionStatus, VideoStatusResponse};

/// Mint a fresh prediction id: `mock_<epochMillis>_<randomAlnum>`.
pub fn new_prediction_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(MOCK_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}{}_{}",
        MOCK_PREDICTION_PREFIX,
        Utc::now().timestamp_millis(),
        suffix
    )
}

/// Creation timestamp embedded in a mock prediction id, if the id carries
/// one. Anything that does not parse is treated as foreign.
pub fn embedded_timestamp_millis(id: &str) -> Option<i64> {
    let rest = id.strip_prefix(MOCK_PREDICTION_PREFIX)?;
    let timestamp_segment = rest.split('_').next()?;
    timestamp_segment.parse().ok()
}

/// Provider status as a pure function of the id and the clock. Elapsed time
/// strictly greater than the generation threshold reports `succeeded` with
/// the fixed sample video; everything else, including ids we do not
/// recognize, reports `processing`.
pub fn derive_status(id: &str, now_millis: i64) -> VideoStatusResponse {
    if let Some(created_at) = embedded_timestamp_millis(id) {
        let elapsed = now_millis.saturating_sub(created_at);
        if elapsed > MOCK_GENERATION_DURATION.as_millis() as i64 {
            return VideoStatusResponse {
                status: PredictionStatus::Succeeded,
                video_url: Some(SAMPLE_VIDEO_URL.to_string()),
                error: None,
            };
        }
    }

    VideoStatusResponse {
        status: PredictionStatus::Processing,
        video_url: None,
        error: None,
    }
}
