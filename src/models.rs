use std::collections::BTreeMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use validator::{Validate, ValidationErrors};

use crate::chat::ReplyEngine;
use crate::config::Config;
use crate::types::{AppError, AppResult, TramiteTipo};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Engine behind `/api/message` and `/api/chat`, picked by `CHAT_ENGINE`.
    pub engine: Arc<dyn ReplyEngine>,
    /// Engine behind `/api/ollama-chat`; always the remote assistant.
    pub remote_engine: Arc<dyn ReplyEngine>,
}

/// Flat name/value view of a trámite, the shape the PDF layouts read from.
pub type FlatRecord = BTreeMap<String, String>;

// Persisted rows
// Note: FromRow is needed for runtime query_as (no DATABASE_URL at compile time)

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct TramiteRecord {
    pub id: i64,
    pub tipo: String,
    pub nombre: String,
    pub documento: String,
    pub grado: String,
    /// Serialized JSON payload of the type-specific fields.
    pub extra: String,
    pub fecha: String,
}

impl TramiteRecord {
    pub fn tipo(&self) -> Option<TramiteTipo> {
        TramiteTipo::from_id(&self.tipo)
    }

    pub fn extra_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.extra).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Common columns plus every scalar entry of `extra`, keyed by field name.
    pub fn to_flat(&self) -> FlatRecord {
        let mut flat = FlatRecord::new();
        if let serde_json::Value::Object(map) = self.extra_value() {
            for (key, value) in map {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                flat.insert(key, text);
            }
        }
        flat.insert("nombre".to_string(), self.nombre.clone());
        flat.insert("documento".to_string(), self.documento.clone());
        flat.insert("grado".to_string(), self.grado.clone());
        flat.insert("fecha".to_string(), self.fecha.clone());
        flat
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub intent: Option<String>,
    pub text: Option<String>,
    pub channel: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    MessageSent,
    MessageReceived,
    TramiteSubmitted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MessageSent => "message_sent",
            EventType::MessageReceived => "message_received",
            EventType::TramiteSubmitted => "tramite_submitted",
        }
    }
}

// API Request/Response types

/// Body of `POST /api/guardar-tramite` and `POST /api/tramite`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, Validate)]
pub struct NewTramite {
    #[validate(
        required(message = "Falta el campo: tipo"),
        length(min = 1, message = "Falta el campo: tipo")
    )]
    #[serde(default, deserialize_with = "lenient_text")]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub grado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Text fields take any JSON scalar: strings as-is, numbers and booleans in
/// their JSON spelling, `null` as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// A submission that passed the required-field checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTramite {
    pub tipo: TramiteTipo,
    pub nombre: String,
    pub documento: String,
    pub grado: String,
    pub extra: serde_json::Value,
    pub channel: String,
}

impl NewTramite {
    pub fn validated(self) -> AppResult<ValidTramite> {
        self.validate()
            .map_err(|e| AppError::Validation(first_message(&e)))?;

        let raw = self.tipo.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(AppError::Validation("Falta el campo: tipo".to_string()));
        }
        let tipo = TramiteTipo::from_id(&raw).ok_or_else(|| {
            AppError::Validation(format!("Tipo de trámite no reconocido: {}", raw))
        })?;

        let extra = match self.extra {
            None | Some(serde_json::Value::Null) => serde_json::json!({}),
            Some(value) => value,
        };

        Ok(ValidTramite {
            tipo,
            nombre: self.nombre.unwrap_or_default(),
            documento: self.documento.unwrap_or_default(),
            grado: self.grado.unwrap_or_default(),
            extra,
            channel: self.channel.unwrap_or_else(|| "web".to_string()),
        })
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TramiteResponse {
    pub ok: bool,
    pub id: i64,
}

/// Body of the chat endpoints. The older frontend sends `pregunta`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ChatRequest {
    #[serde(default, alias = "pregunta")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub intent: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tipo_is_rejected() {
        let err = NewTramite::default().validated().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Falta el campo: tipo"));

        let empty = NewTramite { tipo: Some(String::new()), ..Default::default() };
        assert!(matches!(empty.validated(), Err(AppError::Validation(_))));

        let blank = NewTramite { tipo: Some("   ".to_string()), ..Default::default() };
        assert!(matches!(blank.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_unknown_tipo_is_rejected() {
        let req = NewTramite { tipo: Some("matricula".to_string()), ..Default::default() };
        let err = req.validated().unwrap_err();
        assert!(err.to_string().contains("matricula"));
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let req = NewTramite { tipo: Some("pazysalvo".to_string()), ..Default::default() };
        let valid = req.validated().unwrap();
        assert_eq!(valid.tipo, TramiteTipo::PazYSalvo);
        assert_eq!(valid.nombre, "");
        assert_eq!(valid.extra, serde_json::json!({}));
        assert_eq!(valid.channel, "web");
    }

    #[test]
    fn test_text_fields_accept_any_scalar() {
        let req: NewTramite = serde_json::from_str(
            r#"{"tipo":"constancia","nombre":7,"documento":1234567,"grado":null,"channel":true}"#,
        )
        .unwrap();
        let valid = req.validated().unwrap();
        assert_eq!(valid.nombre, "7");
        assert_eq!(valid.documento, "1234567");
        assert_eq!(valid.grado, "");
        assert_eq!(valid.channel, "true");

        let numeric_tipo: NewTramite = serde_json::from_str(r#"{"tipo":5}"#).unwrap();
        assert!(matches!(numeric_tipo.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_chat_request_accepts_pregunta() {
        let req: ChatRequest = serde_json::from_str(r#"{"pregunta":"hola"}"#).unwrap();
        assert_eq!(req.text, "hola");
    }

    #[test]
    fn test_record_flattens_extra() {
        let record = TramiteRecord {
            id: 1,
            tipo: "inasistencia".to_string(),
            nombre: "Ana".to_string(),
            documento: "123".to_string(),
            grado: "5A".to_string(),
            extra: r#"{"fecha_inasistencia":"2025-03-03","motivo":"Cita médica","dias":2}"#
                .to_string(),
            fecha: "2025-03-04T10:00:00.000Z".to_string(),
        };
        let flat = record.to_flat();
        assert_eq!(flat["motivo"], "Cita médica");
        assert_eq!(flat["dias"], "2");
        assert_eq!(flat["nombre"], "Ana");
        assert_eq!(record.tipo(), Some(TramiteTipo::Inasistencia));
    }
}
