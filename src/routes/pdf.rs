use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use super::extract::ApiPath;
use crate::db::DatabaseOperations;
use crate::models::AppState;
use crate::pdf::{record_filename, render_record};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/descargar-pdf/{id}", get(descargar_pdf))
        .with_state(state)
}

async fn descargar_pdf(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Response> {
    let record = DatabaseOperations::get_tramite(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trámite {} no encontrado", id)))?;

    let bytes = render_record(&record)?;
    info!(id, tipo = %record.tipo, size = bytes.len(), "Serving trámite PDF");

    let disposition = format!("attachment; filename=\"{}\"", record_filename(id));
    Ok((
        [
            (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
