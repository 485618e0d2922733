//! HTTP client for the portal API
//!
//! Used by the UI controllers to submit trámites, fetch server-rendered
//! documents and ask the chat assistant.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::models::{ChatReply, ChatRequest, NewTramite, TramiteResponse};
use crate::types::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response onto the error taxonomy.
    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());

        match status {
            StatusCode::BAD_REQUEST => AppError::Validation(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Upstream(format!("{}: {}", status, message)),
        }
    }

    pub async fn guardar_tramite(&self, tramite: &NewTramite) -> AppResult<i64> {
        debug!(tipo = ?tramite.tipo, "Submitting trámite");
        let response = self
            .http
            .post(self.url("/api/guardar-tramite"))
            .json(tramite)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: TramiteResponse = response.json().await?;
        Ok(body.id)
    }

    pub async fn descargar_pdf(&self, id: i64) -> AppResult<Vec<u8>> {
        let response = self
            .http
            .get(self.url(&format!("/api/descargar-pdf/{}", id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }

    pub async fn enviar_mensaje(&self, text: &str) -> AppResult<ChatReply> {
        let response = self
            .http
            .post(self.url("/api/message"))
            .json(&ChatRequest {
                text: text.to_string(),
                channel: None,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guardar_tramite_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/guardar-tramite")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "tipo": "constancia",
                "nombre": "Ana"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"id":7}"#)
            .create_async()
            .await;

        let client = PortalClient::new(format!("{}/", server.url()));
        let tramite = NewTramite {
            tipo: Some("constancia".to_string()),
            nombre: Some("Ana".to_string()),
            ..Default::default()
        };
        assert_eq!(client.guardar_tramite(&tramite).await.unwrap(), 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_error_maps_to_validation() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/guardar-tramite")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":false,"error":"Falta el campo: tipo"}"#)
            .create_async()
            .await;

        let client = PortalClient::new(server.url());
        let err = client.guardar_tramite(&NewTramite::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Falta el campo: tipo"));
    }

    #[tokio::test]
    async fn test_missing_document_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/descargar-pdf/99")
            .with_status(404)
            .with_body(r#"{"ok":false,"error":"Trámite 99 no encontrado"}"#)
            .create_async()
            .await;

        let client = PortalClient::new(server.url());
        assert!(matches!(client.descargar_pdf(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_upstream_error() {
        let client = PortalClient::new("http://127.0.0.1:1");
        assert!(matches!(client.enviar_mensaje("hola").await, Err(AppError::Upstream(_))));
    }
}
