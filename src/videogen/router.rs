use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{app_state::AppState, consts::MAX_REQUEST_BODY_BYTES, videogen::handlers};

/// Routes for the mock video generation API. The body limit is generous
/// because image-to-video requests carry the source image inline as base64.
pub fn videogen_router<S>(state: Arc<AppState>) -> OpenApiRouter<S> {
    OpenApiRouter::new()
        .routes(routes!(handlers::generate_video))
        .routes(routes!(handlers::check_video))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
