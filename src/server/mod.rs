//! HTTP surface of the studio
//!
//! Three JSON routes backed by [`App`] plus the single-page studio UI.

pub mod error;

pub use error::ApiError;

use crate::app::App;
use crate::models::{
    AssistantResponse, DescriptionRequest, DescriptionResponse, ImageRequest, ImageResponse,
};
use crate::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const STUDIO_PAGE: &str = include_str!("../../static/index.html");

/// Build the studio router around a shared [`App`].
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(studio_page))
        .route(
            "/api/assistant",
            post(provision_assistant).fallback(assistant_method_not_allowed),
        )
        .route("/api/description", post(generate_description))
        .route("/api/image", post(generate_image))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serve the studio on `addr` until Ctrl+C or SIGTERM.
pub async fn serve(app: Arc<App>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Studio listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Studio stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}

async fn studio_page() -> Html<&'static str> {
    Html(STUDIO_PAGE)
}

async fn provision_assistant(
    State(app): State<Arc<App>>,
) -> std::result::Result<Json<AssistantResponse>, ApiError> {
    match app.provision_assistant().await {
        Ok(assistant_id) => Ok(Json(AssistantResponse { assistant_id })),
        Err(e) => {
            let message = e.to_string();
            Err(ApiError::from_error(e, &message))
        }
    }
}

async fn assistant_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method,
        allow: "POST",
    }
}

async fn generate_description(
    State(app): State<Arc<App>>,
    body: std::result::Result<Json<DescriptionRequest>, JsonRejection>,
) -> std::result::Result<Json<DescriptionResponse>, ApiError> {
    let Json(request) = body.map_err(reject_body)?;

    let description = app
        .describe(&request.theme)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to generate description"))?;

    Ok(Json(DescriptionResponse { description }))
}

async fn generate_image(
    State(app): State<Arc<App>>,
    body: std::result::Result<Json<ImageRequest>, JsonRejection>,
) -> std::result::Result<Json<ImageResponse>, ApiError> {
    let Json(request) = body.map_err(reject_body)?;

    let image_url = app
        .paint(&request)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to generate image"))?;

    Ok(Json(ImageResponse { image_url }))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::from_error(
        crate::Error::InvalidInput(rejection.body_text()),
        "Invalid request body",
    )
}
