// EduBot - School service portal: trámite requests, certificates and a chat assistant

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod chat;      // Keyword and remote (Ollama) reply engines
pub mod pdf;
pub mod routes;
pub mod middleware;
pub mod client;    // HTTP client used by the UI controllers
pub mod ui;        // Rendering-agnostic portal controllers
pub mod utils;

use std::sync::Arc;

use tokio::net::TcpListener;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult, TramiteTipo};

/// Open the database, apply migrations and build both reply engines.
pub async fn build_state(config: Config) -> AppResult<AppState> {
    let pool = db::connect(&config.database).await?;
    let engine = chat::build_engine(&config.chat);
    let remote_engine: Arc<dyn chat::ReplyEngine> =
        Arc::new(chat::OllamaEngine::from_config(&config.chat));

    Ok(AppState {
        pool,
        config,
        engine,
        remote_engine,
    })
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

/// Bind the listening socket. `host` may be an IP literal or a hostname.
pub async fn bind_listener(server: &config::ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((server.host.as_str(), server.port)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_accepts_hostname() {
        let mut config = Config::in_memory();
        config.server.host = "localhost".to_string();

        let listener = bind_listener(&config.server).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_accepts_ip_literal() {
        let config = Config::in_memory();
        let listener = bind_listener(&config.server).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
