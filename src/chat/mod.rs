//! Chat reply engines
//!
//! Two engines answer the portal's chat window:
//! - [`KeywordEngine`] matches canned answers against the question text
//! - [`OllamaEngine`] relays the question to an external assistant

pub mod keywords;
pub mod remote;

pub use keywords::*;
pub use remote::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ChatConfig, ChatEngineKind};
use crate::models::ChatReply;

#[async_trait]
pub trait ReplyEngine: Send + Sync {
    /// Answer one question. Engines keep no state between turns and never fail:
    /// an unreachable backend becomes a fixed apology reply.
    async fn reply(&self, text: &str) -> ChatReply;
}

/// Engine selected by `CHAT_ENGINE`.
pub fn build_engine(config: &ChatConfig) -> Arc<dyn ReplyEngine> {
    match config.engine {
        ChatEngineKind::Local => Arc::new(KeywordEngine),
        ChatEngineKind::Remote => Arc::new(OllamaEngine::from_config(config)),
    }
}
