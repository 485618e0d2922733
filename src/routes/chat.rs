use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, warn};

use super::extract::ApiJson;
use crate::chat::ReplyEngine;
use crate::db::DatabaseOperations;
use crate::models::{AppState, ChatReply, ChatRequest, EventType};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/message", post(post_message))
        .route("/api/chat", post(post_message))
        .route("/api/ollama-chat", post(post_ollama_chat))
        .with_state(state)
}

pub async fn post_message(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Json<ChatReply> {
    let engine = state.engine.clone();
    Json(answer(&state, engine.as_ref(), request).await)
}

pub async fn post_ollama_chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Json<ChatReply> {
    let engine = state.remote_engine.clone();
    Json(answer(&state, engine.as_ref(), request).await)
}

/// Log the question, ask the engine, log the answer. Audit failures never
/// block the reply.
async fn answer(state: &AppState, engine: &dyn ReplyEngine, request: ChatRequest) -> ChatReply {
    let text = request.text.trim();
    let channel = request.channel.as_deref().unwrap_or("web");
    info!(message_len = text.len(), channel, "Received chat message");

    if let Err(e) =
        DatabaseOperations::insert_event(&state.pool, EventType::MessageSent, None, Some(text), channel)
            .await
    {
        warn!(error = %e, "Failed to record sent message");
    }

    let reply = engine.reply(text).await;

    if let Err(e) = DatabaseOperations::insert_event(
        &state.pool,
        EventType::MessageReceived,
        Some(&reply.intent),
        Some(&reply.reply),
        channel,
    )
    .await
    {
        warn!(error = %e, "Failed to record reply");
    }

    reply
}
