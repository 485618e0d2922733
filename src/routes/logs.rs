use axum::{extract::State, routing::get, Json, Router};

use crate::db::DatabaseOperations;
use crate::models::{AppState, EventRecord};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/logs", get(list_logs))
        .with_state(state)
}

async fn list_logs(State(state): State<AppState>) -> AppResult<Json<Vec<EventRecord>>> {
    let events = DatabaseOperations::list_events(&state.pool).await?;
    Ok(Json(events))
}
