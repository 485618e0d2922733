//! API Routes
//!
//! This module organizes all HTTP endpoints for the portal:
//! - `/api/guardar-tramite`, `/api/tramite` - Store a trámite request
//! - `/api/descargar-pdf/{id}` - Download the certificate for a stored trámite
//! - `/api/message`, `/api/chat`, `/api/ollama-chat` - Chat assistant
//! - `/api/logs` - Event audit log
//! - `/api/health` - Health checks
//! - `/` - Static file serving (frontend)

pub mod chat;
pub mod extract;
pub mod health;
pub mod logs;
pub mod pdf;
pub mod static_files;
pub mod tramites;

use axum::Router;
use crate::middleware::{cors_layer, trace_layer};
use crate::models::AppState;
use tracing::info;

/// Create the main application router
///
/// API routes take precedence over static files; CORS only admits the
/// configured origin.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origin);
    let frontend_dir = state.config.server.frontend_dir.clone();

    let api_router = Router::new()
        .merge(tramites::router(state.clone()))
        .merge(pdf::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(logs::router(state.clone()))
        .merge(health::router(state));

    Router::new()
        .merge(api_router)
        .merge(static_files::router(frontend_dir))
        .layer(cors)
        .layer(trace_layer())
}
