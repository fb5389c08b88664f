use once_cell::sync::Lazy;
use reqwest::Url;
use std::time::Duration;

/// Returned as the result of every successful mock generation (public domain video).
pub static SAMPLE_VIDEO_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4")
        .unwrap()
});

/// Mock prediction ids look like `mock_<epochMillis>_<randomAlnum>`.
pub const MOCK_PREDICTION_PREFIX: &str = "mock_";

pub const MOCK_SUFFIX_LEN: usize = 9;

/// Simulated generation time; a mock prediction reports `succeeded` once
/// strictly more than this has elapsed since its embedded creation timestamp.
pub const MOCK_GENERATION_DURATION: Duration = Duration::from_millis(5000);

/// Fixed delay between status checks for one job.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Unsuccessful status checks tolerated before a job is failed as timed out.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

pub const MAX_REQUEST_BODY_BYTES: usize = 50 * 1024 * 1024;
