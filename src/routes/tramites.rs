use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, warn};

use super::extract::ApiJson;
use crate::db::DatabaseOperations;
use crate::models::{AppState, EventType, NewTramite, TramiteResponse};
use crate::types::AppResult;

/// Both paths share one handler and one response shape.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/guardar-tramite", post(guardar_tramite))
        .route("/api/tramite", post(guardar_tramite))
        .with_state(state)
}

pub async fn guardar_tramite(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewTramite>,
) -> AppResult<Json<TramiteResponse>> {
    let tramite = request.validated()?;
    info!(tipo = %tramite.tipo, "Received trámite submission");

    let id = DatabaseOperations::insert_tramite(&state.pool, &tramite).await?;

    let summary = format!("{} - {} - {}", tramite.tipo, tramite.nombre, tramite.grado);
    if let Err(e) = DatabaseOperations::insert_event(
        &state.pool,
        EventType::TramiteSubmitted,
        Some(tramite.tipo.as_str()),
        Some(&summary),
        &tramite.channel,
    )
    .await
    {
        warn!(error = %e, id, "Failed to record trámite event");
    }

    Ok(Json(TramiteResponse { ok: true, id }))
}
