use crate::models::FlatRecord;
use crate::types::TramiteTipo;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

pub const INSTITUTION: &str = "Institución Educativa";
pub const SIGNATURE: &str = "Secretaría Académica";

const MARGIN_X: f32 = 72.0;
const BODY_TOP: f32 = 690.0;
const LINE_GAP: f32 = 22.0;

/// One run of text at a fixed position, in PDF points from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
}

impl TextLine {
    fn new(x: f32, y: f32, size: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            text: text.into(),
        }
    }
}

fn field<'a>(data: &'a FlatRecord, name: &str) -> &'a str {
    data.get(name).map(|s| s.trim()).unwrap_or("")
}

/// Date part of an RFC 3339 timestamp; anything else is shown as-is.
fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn body_lines(tipo: TramiteTipo, data: &FlatRecord) -> Vec<String> {
    let nombre = field(data, "nombre");
    let documento = field(data, "documento");
    let grado = field(data, "grado");

    match tipo {
        TramiteTipo::Constancia => vec![
            format!("La institución hace constar que {},", nombre),
            format!("identificado(a) con documento {},", documento),
            format!("se encuentra matriculado(a) en el grado {}.", grado),
        ],
        TramiteTipo::Calificaciones => vec![
            format!("Estudiante: {}", nombre),
            format!("Documento: {}", documento),
            format!("Grado: {}", grado),
            format!("Año lectivo: {}", field(data, "anio")),
            "Se certifican las calificaciones obtenidas en el año indicado.".to_string(),
        ],
        TramiteTipo::Inasistencia => vec![
            format!("Estudiante: {}", nombre),
            format!("Documento: {}", documento),
            format!("Grado: {}", grado),
            format!("Fecha de inasistencia: {}", field(data, "fecha_inasistencia")),
            format!("Motivo: {}", field(data, "motivo")),
        ],
        TramiteTipo::PazYSalvo => vec![
            format!("Se certifica que {}, documento {},", nombre, documento),
            format!("del grado {}, se encuentra a paz y salvo", grado),
            "con la institución por todo concepto.".to_string(),
        ],
    }
}

/// Fixed-position lines for a request type. `None` (an unrecognized type)
/// yields only the institution header.
pub fn layout(tipo: Option<TramiteTipo>, data: &FlatRecord) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new(MARGIN_X, 780.0, 16.0, INSTITUTION)];

    let Some(tipo) = tipo else {
        return lines;
    };

    lines.push(TextLine::new(MARGIN_X, 740.0, 14.0, tipo.title()));

    let body = body_lines(tipo, data);
    let mut y = BODY_TOP;
    for text in body {
        lines.push(TextLine::new(MARGIN_X, y, 12.0, text));
        y -= LINE_GAP;
    }

    let fecha = field(data, "fecha");
    if !fecha.is_empty() {
        y -= LINE_GAP;
        lines.push(TextLine::new(
            MARGIN_X,
            y,
            11.0,
            format!("Fecha de expedición: {}", display_date(fecha)),
        ));
    }

    lines.push(TextLine::new(MARGIN_X, 120.0, 11.0, SIGNATURE));
    lines
}
