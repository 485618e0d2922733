use axum::{extract::State, routing::get, Json, Router};
use tracing::warn;

use crate::db::health_check as database_health;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match database_health(&state.pool).await {
        Ok(_) => "connected",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: database.to_string(),
    })
}
