//! Static File Serving
//!
//! Serves the portal frontend (HTML, CSS and scripts) from the configured
//! frontend directory. Paths outside that directory are never served.

use axum::{
    Router,
    routing::get,
    response::{IntoResponse, Response},
    http::{StatusCode, header},
};
use tower_http::services::ServeDir;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Entry pages tried in order at `/`.
const INDEX_PAGES: [&str; 2] = ["pagina.html", "index.html"];

/// Create router for serving static files
pub fn router(frontend_dir: PathBuf) -> Router {
    if frontend_dir.is_dir() {
        info!(path = %frontend_dir.display(), "Found frontend directory");
    } else {
        warn!(path = %frontend_dir.display(), "Frontend directory not found, serving API page only");
    }

    let serve_dir = ServeDir::new(&frontend_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(move || serve_index(frontend_dir.clone())))
        .fallback_service(serve_dir)
}

/// Serve the entry page, or a short API overview when no frontend is present
async fn serve_index(frontend_dir: PathBuf) -> Response {
    if let Some(content) = read_index(&frontend_dir).await {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        FALLBACK_HTML,
    )
        .into_response()
}

async fn read_index(frontend_dir: &Path) -> Option<String> {
    for page in INDEX_PAGES {
        if let Ok(content) = tokio::fs::read_to_string(frontend_dir.join(page)).await {
            return Some(content);
        }
    }
    None
}

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>EduBot - API</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 760px; margin: 0 auto; padding: 40px 20px; }
        code { background: #f0f0f0; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>EduBot</h1>
    <p>El servidor está activo. No se encontró el directorio del frontend.</p>
    <ul>
        <li><code>POST /api/guardar-tramite</code> - Registrar un trámite</li>
        <li><code>GET /api/descargar-pdf/{id}</code> - Descargar el certificado</li>
        <li><code>POST /api/message</code> - Chat asistente</li>
        <li><code>POST /api/ollama-chat</code> - Chat con asistente remoto</li>
        <li><code>GET /api/logs</code> - Registro de eventos</li>
        <li><code>GET /api/health</code> - Estado del servidor</li>
    </ul>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefers_pagina_html() {
        let dir = tempfile::TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("index.html"), "index").await.unwrap();
        tokio::fs::write(dir.path().join("pagina.html"), "pagina").await.unwrap();

        assert_eq!(read_index(dir.path()).await.as_deref(), Some("pagina"));
    }

    #[tokio::test]
    async fn test_missing_frontend_has_no_index() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_index(dir.path()).await.is_none());
    }
}
