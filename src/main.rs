use tracing::info;
use edubot::{bind_listener, config::Config, create_router, utils::init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing; the guard flushes the log file on exit
    let _log_guard = init_logger(&config.logging);
    info!("Configuration loaded: {:?}", config.server);
    info!(engine = ?config.chat.engine, "Chat engine selected");

    // Connect to database and run migrations
    let state = edubot::build_state(config.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;

    // Create router
    let app = create_router(state);

    // Start server
    let listener = bind_listener(&config.server).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind {}:{}: {}",
            config.server.host,
            config.server.port,
            e
        )
    })?;
    info!("Servidor backend escuchando en http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
