use thiserror::Error;

/// Failures across the generation lifecycle. `NetworkError` covers transport
/// and parse failures on our side of the wire; `ProviderError` carries a
/// failure the provider itself reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoGenError {
    #[error("Missing prediction ID")]
    MissingPredictionId,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Timeout: Video generation took too long")]
    Timeout,
}
