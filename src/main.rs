use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::instrument;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use videogen_agent::app_state::AppState;
use videogen_agent::config::AppConfig;
use videogen_agent::consts::MAX_REQUEST_BODY_BYTES;
use videogen_agent::middleware::http_logging_middleware;
use videogen_agent::videogen::videogen_router;

async fn main_impl() -> Result<()> {
    #[derive(OpenApi)]
    #[openapi(
        tags(
            (name = "VideoGen", description = "Mock video generation API"),
        )
    )]
    struct ApiDoc;

    let conf = AppConfig::load()?;
    let shared_state = Arc::new(AppState::new(conf.clone()));

    let router =
        OpenApiRouter::with_openapi(ApiDoc::openapi()).merge(videogen_router(shared_state));

    let (router, api) = router.split_for_parts();
    let router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api));

    let http = router.route("/healthz", get(health_handler)).layer(
        ServiceBuilder::new()
            .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
            .layer(CorsLayer::permissive())
            .layer(axum::middleware::from_fn(http_logging_middleware)),
    );

    let addr: SocketAddr = format!("{}:{}", conf.host, conf.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("listening on {addr}");

    axum::serve(listener, http).await?;

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default to info level, with warn for noisy crates
                format!(
                    "{}=info,tower_http=warn,axum::rejection=warn,hyper=warn,reqwest=warn",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main_impl())
}

#[instrument]
async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
