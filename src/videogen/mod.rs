pub mod handlers;
pub mod prediction;
pub mod router;
pub mod types;

pub use router::videogen_router;
pub use types::{
    ErrorResponse, GenerationMode, PredictionStatus, VideoGenQueuedResponse, VideoGenRequest,
    VideoStatusResponse,
};
