//! # server
//!
//! HTTP prediction service for housing price models.
//!
//! Serves one immutable model loaded from the [`ModelRegistry`] at startup:
//!
//! - `POST /predict` scores an 8-feature row
//! - `GET /health`, `GET /health/live` liveness
//! - `GET /health/ready` readiness (503 while no model is loaded)

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use registry::ModelRegistry;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::{ErrorResponse, PredictError, ServeError};
pub use routes::{parse_features, PredictResponse, NOT_FOUND_MESSAGE, PREDICTION_MESSAGE};
pub use state::{AppState, Degraded};

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Build the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/health", get(routes::liveness))
        // API endpoints
        .route("/predict", post(routes::predict))
        .fallback(routes::not_found)
        .with_state(state);

    with_layers(router)
}

fn with_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(error_kind = "panic", error = detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

/// Load the model, bind and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr()?;
    let state = AppState::from_registry(&ModelRegistry::new(config.model_path.clone()));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        ready = state.is_ready(),
        "server listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
