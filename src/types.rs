// Type definitions and enums

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// The closed set of administrative requests the portal accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TramiteTipo {
    Constancia,
    Calificaciones,
    Inasistencia,
    PazYSalvo,
}

impl TramiteTipo {
    pub const ALL: [TramiteTipo; 4] = [
        TramiteTipo::Constancia,
        TramiteTipo::Calificaciones,
        TramiteTipo::Inasistencia,
        TramiteTipo::PazYSalvo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TramiteTipo::Constancia => "constancia",
            TramiteTipo::Calificaciones => "calificaciones",
            TramiteTipo::Inasistencia => "inasistencia",
            TramiteTipo::PazYSalvo => "pazysalvo",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "constancia" => Some(TramiteTipo::Constancia),
            "calificaciones" => Some(TramiteTipo::Calificaciones),
            "inasistencia" => Some(TramiteTipo::Inasistencia),
            "pazysalvo" => Some(TramiteTipo::PazYSalvo),
            _ => None,
        }
    }

    /// Human readable title, used for the modal header and the PDF heading.
    pub fn title(&self) -> &'static str {
        match self {
            TramiteTipo::Constancia => "Constancia de estudio",
            TramiteTipo::Calificaciones => "Certificado de calificaciones",
            TramiteTipo::Inasistencia => "Justificación de inasistencia",
            TramiteTipo::PazYSalvo => "Paz y salvo",
        }
    }
}

impl std::fmt::Display for TramiteTipo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Insert of a new trámite failed; reported to the caller as a save error.
    #[error("Failed to save trámite: {0}")]
    SaveTramite(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Cuerpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Parámetro inválido: {}", rejection.body_text()))
    }
}

impl From<lopdf::Error> for AppError {
    fn from(e: lopdf::Error) -> Self {
        AppError::Pdf(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_)
            | AppError::SaveTramite(_)
            | AppError::Migration(_)
            | AppError::Pdf(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(m) => m.clone(),
            AppError::NotFound(m) => m.clone(),
            AppError::Storage(e) => {
                error!(error = %e, "storage error");
                "Error al consultar la base de datos".to_string()
            }
            AppError::SaveTramite(e) => {
                error!(error = %e, "failed to save trámite");
                "Error al guardar trámite".to_string()
            }
            AppError::Migration(e) => {
                error!(error = %e, "migration error");
                "Error interno del servidor".to_string()
            }
            AppError::Upstream(m) => {
                error!(message = %m, "upstream service error");
                "Servicio externo no disponible".to_string()
            }
            AppError::Pdf(m) => {
                error!(message = %m, "pdf rendering error");
                "Error al generar el documento".to_string()
            }
            AppError::Internal(m) => {
                error!(message = %m, "internal server error");
                "Error interno del servidor".to_string()
            }
        };

        (self.status(), Json(json!({ "ok": false, "error": message }))).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_ids_are_stable() {
        for tipo in TramiteTipo::ALL {
            assert_eq!(TramiteTipo::from_id(tipo.as_str()), Some(tipo));
        }
        assert_eq!(TramiteTipo::from_id(" PazYSalvo "), Some(TramiteTipo::PazYSalvo));
        assert_eq!(TramiteTipo::from_id("matricula"), None);
    }

    #[test]
    fn test_tipo_serde_matches_wire_ids() {
        let json = serde_json::to_string(&TramiteTipo::PazYSalvo).unwrap();
        assert_eq!(json, "\"pazysalvo\"");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Storage(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::SaveTramite(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
