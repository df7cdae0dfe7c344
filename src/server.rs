//!
//! designboard HTTP server
//! ------------------------
//! This module defines the Axum-based HTTP API over the in-memory file tree.
//!
//! Responsibilities:
//! - File CRUD endpoints delegating to `SharedFileStore`.
//! - Tree assembly for listings (`GET /files`), flat listing on request.
//! - Translation of store errors into status codes and JSON error bodies.
//! - Liveness/health endpoints and startup logging.
//!
//! File routes are mounted both at the top level and under `/api`, the prefix the
//! web front end calls.

use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::storage::{FilePatch, FileRecord, FileStore, NewFile, SharedFileStore};

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedFileStore,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: SharedFileStore) -> Self {
        Self { store, started_at: Utc::now() }
    }
}

/// Build the router with all routes mounted.
pub fn router(state: AppState) -> Router {
    let files: Router<AppState> = Router::new()
        .route("/files", get(list_files).post(create_file))
        .route("/files/{id}", get(get_file).patch(update_file).delete(delete_file));

    Router::new()
        .route("/", get(|| async { "designboard ok" }))
        .route("/health", get(health))
        .merge(files.clone())
        .nest("/api", files)
        .with_state(state)
}

/// Start the HTTP server described by `cfg` and run until ctrl-c.
pub async fn run_with_config(cfg: &ServerConfig) -> anyhow::Result<()> {
    let store = if cfg.seed_enabled() { FileStore::with_seed() } else { FileStore::new() };
    info!(target: "startup", "file store ready: records={}, seeded={}", store.len(), cfg.seed_enabled());
    let state = AppState::new(SharedFileStore::new(store));

    let addr: SocketAddr = cfg.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
    info!("Starting server on {}", addr);
    serve(listener, state).await
}

/// Serve the API on an already-bound listener. Used by `run_with_config` and tests.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    flat: bool,
}

async fn list_files(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    if params.flat {
        let all = state.store.list_all();
        debug!("list_files: flat records={}", all.len());
        return Json(all).into_response();
    }
    let tree = state.store.tree();
    debug!("list_files: top_level={}", tree.len());
    Json(tree).into_response()
}

async fn get_file(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<FileRecord>> {
    let rec = state.store.get(&id)?;
    Ok(Json(rec))
}

fn body_error(rejection: JsonRejection) -> AppError {
    AppError::user("invalid_body".to_string(), rejection.body_text())
}

async fn create_file(
    State(state): State<AppState>,
    payload: Result<Json<NewFile>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FileRecord>)> {
    let Json(new) = payload.map_err(body_error)?;
    match state.store.create(new) {
        Ok(rec) => Ok((StatusCode::CREATED, Json(rec))),
        Err(e) => {
            warn!("create_file rejected: {}", e);
            Err(e.into())
        }
    }
}

async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FilePatch>, JsonRejection>,
) -> AppResult<Json<FileRecord>> {
    let Json(patch) = payload.map_err(body_error)?;
    match state.store.update(&id, patch) {
        Ok(rec) => Ok(Json(rec)),
        Err(e) => {
            warn!("update_file rejected: id='{}' {}", id, e);
            Err(e.into())
        }
    }
}

async fn delete_file(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    match state.store.delete(&id) {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(AppError::not_found("not_found".to_string(), format!("file not found: {}", id))),
        Err(e) => {
            warn!("delete_file rejected: id='{}' {}", id, e);
            Err(e.into())
        }
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "files": state.store.len(),
        "startedAt": state.started_at.to_rfc3339(),
    }))
}
