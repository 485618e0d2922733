//! Certificate PDFs for trámites
//!
//! [`layout`] turns a request type and its flat field map into positioned text
//! lines; [`render`] writes those lines onto a single A4 page with lopdf.

pub mod layout;
pub mod render;

pub use layout::*;
pub use render::*;

use crate::models::{FlatRecord, TramiteRecord};
use crate::types::{AppResult, TramiteTipo};

/// Render the document for a type label coming from the client.
/// Unrecognized labels still produce a (header only) document.
pub fn render_document(tipo: &str, data: &FlatRecord) -> AppResult<Vec<u8>> {
    render(&layout(TramiteTipo::from_id(tipo), data))
}

pub fn render_record(record: &TramiteRecord) -> AppResult<Vec<u8>> {
    render(&layout(record.tipo(), &record.to_flat()))
}

/// Download name for a document rendered in the client.
pub fn local_filename(tipo: &str) -> String {
    format!("{}.pdf", tipo.trim())
}

/// Download name for a document served by id.
pub fn record_filename(id: i64) -> String {
    format!("tramite_{}.pdf", id)
}
