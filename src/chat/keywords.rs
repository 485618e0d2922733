use async_trait::async_trait;

use super::ReplyEngine;
use crate::models::ChatReply;

pub const DEFAULT_REPLY: &str =
    "Puedo ayudarte con información sobre matrículas, horarios, constancias, rutas y más.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Horario,
    Matricula,
    Constancia,
    Calendario,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Horario => "horario",
            Intent::Matricula => "matricula",
            Intent::Constancia => "constancia",
            Intent::Calendario => "calendario",
            Intent::Fallback => "fallback",
        }
    }
}

/// Ordered keyword table; the first keyword found in the question wins.
const RESPONSES: [(&str, Intent, &str); 4] = [
    (
        "horario",
        Intent::Horario,
        "El horario escolar es de lunes a viernes de 7:00 a.m. a 2:00 p.m.",
    ),
    (
        "matrícula",
        Intent::Matricula,
        "La matrícula se realiza en línea a través del portal educativo oficial.",
    ),
    (
        "constancia",
        Intent::Constancia,
        "Puedes solicitar constancias en la oficina administrativa o en línea.",
    ),
    (
        "calendario",
        Intent::Calendario,
        "El calendario escolar está disponible en el sitio web oficial.",
    ),
];

/// Classify a question and pick its canned answer.
pub fn detect_intent(text: &str) -> (Intent, &'static str) {
    let lowered = text.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keyword, _, _)| lowered.contains(keyword))
        .map(|(_, intent, reply)| (*intent, *reply))
        .unwrap_or((Intent::Fallback, DEFAULT_REPLY))
}

pub fn bot_reply(text: &str) -> &'static str {
    detect_intent(text).1
}

/// Local engine backed by the keyword table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEngine;

#[async_trait]
impl ReplyEngine for KeywordEngine {
    async fn reply(&self, text: &str) -> ChatReply {
        let (intent, reply) = detect_intent(text);
        ChatReply {
            reply: reply.to_string(),
            intent: intent.as_str().to_string(),
        }
    }
}
