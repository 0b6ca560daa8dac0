// Web server: Axum-based hazard prediction service.
//
// The model is loaded once at startup and shared read-only by every request.
// Routes serve JSON only: POST /predict classifies one description,
// GET /health reports liveness and which classes the model knows.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::model::labels::LabelTable;
use crate::model::predict::BatchPredictor;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<BatchPredictor>,
}

impl AppState {
    /// Wrap a predictor for serving. A model without a class list is served
    /// with the legacy code table so codes still come back as hazard names.
    pub fn new(predictor: BatchPredictor) -> Self {
        let predictor = if predictor.labels().is_some() {
            predictor
        } else {
            info!("Model has no class list; serving with the legacy label table");
            predictor.with_labels(LabelTable::legacy())
        };
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

/// Start the Axum server and block until it exits.
pub async fn run_server(predictor: BatchPredictor, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState::new(predictor));

    let addr = format!("{bind}:{port}");
    info!("Hazard prediction service listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check. Always returns 200 OK.
async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let classes = state
        .predictor
        .labels()
        .map(|t| t.names().to_vec())
        .unwrap_or_default();
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok", "classes": classes })),
    )
}

/// Typed JSON error response helper. Errors carry a `detail` message.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "detail": message }))).into_response()
}
