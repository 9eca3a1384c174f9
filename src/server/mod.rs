use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::errors::{IdeaError, Issue};
use crate::favorites::FavoriteStore;
use crate::generate::IdeaGenerator;
use crate::merge::{merge_favorites, toggle_favorite};
use crate::wire::{ContentIdea, Envelope, GenerationRequest};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct AppState {
    pub generator: IdeaGenerator,
    pub favorites: Arc<dyn FavoriteStore>,
}

type SharedState = Arc<AppState>;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError(IdeaError);

impl From<IdeaError> for AppError {
    fn from(e: IdeaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            IdeaError::RequestShape(issues) => {
                (StatusCode::BAD_REQUEST, Json(Envelope::issues(issues))).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::error(other.to_string()))).into_response()
            }
        }
    }
}

fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        AppError(IdeaError::RequestShape(vec![Issue::new("$", "JSON object", e.to_string())]))
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/generate", post(generate))
        .route("/api/favorites", get(list_favorites))
        .route("/api/favorites/toggle", post(toggle))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(Arc::new(state));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("ideagen listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("ideagen shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate(State(state): State<SharedState>, body: Bytes) -> Result<axum::response::Response, AppError> {
    let req = GenerationRequest::from_json(&parse_body(&body)?)?;
    let result = state.generator.generate(&req).await?;
    let favorite_ids = state.favorites.snapshot()?;
    let merged = merge_favorites(&result, &favorite_ids);
    Ok(Json(Envelope::ok(merged)).into_response())
}

async fn list_favorites(State(state): State<SharedState>) -> Result<axum::response::Response, AppError> {
    let ids = state.favorites.list()?;
    Ok(Json(Envelope::ok(ids)).into_response())
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ToggleBody {
    idea: ContentIdea,
}

async fn toggle(State(state): State<SharedState>, body: Bytes) -> Result<axum::response::Response, AppError> {
    let body: ToggleBody = serde_json::from_value(parse_body(&body)?).map_err(|e| {
        AppError(IdeaError::RequestShape(vec![Issue::new("idea", "content idea", e.to_string())]))
    })?;
    let toggled = toggle_favorite(&body.idea, state.favorites.as_ref())?;
    Ok(Json(Envelope::ok(toggled)).into_response())
}
