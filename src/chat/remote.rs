//! Remote assistant engine
//!
//! Relays the question to an Ollama server (`POST /api/generate`) and returns
//! its answer verbatim. No timeout is configured on the outbound call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ReplyEngine;
use crate::config::ChatConfig;
use crate::models::ChatReply;
use crate::types::{AppError, AppResult};

pub const CONNECTION_ERROR_REPLY: &str =
    "Lo siento, no pude conectar con el asistente. Intenta de nuevo más tarde.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaEngine {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEngine {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(&config.remote_url, &config.remote_model)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the raw question and return the assistant's text.
    pub async fn ask(&self, text: &str) -> AppResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(url = %url, model = %self.model, "Forwarding question to remote assistant");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: text,
                stream: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "assistant responded with status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

#[async_trait]
impl ReplyEngine for OllamaEngine {
    async fn reply(&self, text: &str) -> ChatReply {
        match self.ask(text).await {
            Ok(reply) => ChatReply {
                reply,
                intent: "remote".to_string(),
            },
            Err(e) => {
                warn!(error = %e, "Remote assistant unreachable");
                ChatReply {
                    reply: CONNECTION_ERROR_REPLY.to_string(),
                    intent: "error".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let engine = OllamaEngine::new("http://localhost:11434/", "llama3");
        assert_eq!(engine.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_relays_reply_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "llama3",
                "prompt": "¿Cuándo inician las clases?",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":"Las clases inician el 10 de febrero.","done":true}"#)
            .create_async()
            .await;

        let engine = OllamaEngine::new(server.url(), "llama3");
        let reply = engine.reply("¿Cuándo inician las clases?").await;

        mock.assert_async().await;
        assert_eq!(reply.reply, "Las clases inician el 10 de febrero.");
        assert_eq!(reply.intent, "remote");
    }

    #[tokio::test]
    async fn test_server_error_becomes_apology() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .create_async()
            .await;

        let engine = OllamaEngine::new(server.url(), "llama3");
        assert!(engine.ask("hola").await.is_err());
        assert_eq!(engine.reply("hola").await.reply, CONNECTION_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_unreachable_service_becomes_apology() {
        let engine = OllamaEngine::new("http://127.0.0.1:1", "llama3");
        let reply = engine.reply("hola").await;
        assert_eq!(reply.reply, CONNECTION_ERROR_REPLY);
        assert_eq!(reply.intent, "error");
    }
}
