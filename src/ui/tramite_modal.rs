//! Trámite request modal
//!
//! closed → open (on "solicitar") → closed (cancel or successful submit).
//! Opening captures the request type, resets the form and renders the
//! type-specific extra fields.

use serde_json::{Map, Value};
use thiserror::Error;

use super::escape_html;
use crate::models::{FlatRecord, NewTramite};
use crate::types::{AppError, TramiteTipo};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("the trámite form is not open")]
    NotOpen,

    #[error("field {field} does not belong to the {tipo} form")]
    UnknownField { field: String, tipo: TramiteTipo },
}

impl From<ModalError> for AppError {
    fn from(e: ModalError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    TextArea,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Fields every request carries; they travel at the top level of the submission.
pub const COMMON_FIELDS: [FieldSpec; 3] = [
    FieldSpec { name: "nombre", label: "Nombre completo", kind: FieldKind::Text },
    FieldSpec { name: "documento", label: "Documento de identidad", kind: FieldKind::Text },
    FieldSpec { name: "grado", label: "Grado", kind: FieldKind::Text },
];

const INASISTENCIA_FIELDS: [FieldSpec; 2] = [
    FieldSpec { name: "fecha_inasistencia", label: "Fecha de la inasistencia", kind: FieldKind::Date },
    FieldSpec { name: "motivo", label: "Motivo", kind: FieldKind::TextArea },
];

const CALIFICACIONES_FIELDS: [FieldSpec; 1] = [
    FieldSpec { name: "anio", label: "Año lectivo", kind: FieldKind::Year },
];

/// Type-specific inputs beyond [`COMMON_FIELDS`].
pub fn extra_fields(tipo: TramiteTipo) -> &'static [FieldSpec] {
    match tipo {
        TramiteTipo::Inasistencia => &INASISTENCIA_FIELDS,
        TramiteTipo::Calificaciones => &CALIFICACIONES_FIELDS,
        TramiteTipo::Constancia | TramiteTipo::PazYSalvo => &[],
    }
}

fn render_field(field: &FieldSpec) -> String {
    let input = match field.kind {
        FieldKind::Text => format!(r#"<input type="text" name="{}">"#, field.name),
        FieldKind::Date => format!(r#"<input type="date" name="{}" required>"#, field.name),
        FieldKind::TextArea => format!(r#"<textarea name="{}" rows="3" required></textarea>"#, field.name),
        FieldKind::Year => format!(
            r#"<input type="number" name="{}" min="2000" max="2100" required>"#,
            field.name
        ),
    };
    format!("<label>{}</label>\n{}", escape_html(field.label), input)
}

/// Markup for the extra-fields panel; empty for types without extra fields.
pub fn render_extra_fields(tipo: TramiteTipo) -> String {
    extra_fields(tipo)
        .iter()
        .map(render_field)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenModal {
    pub tipo: TramiteTipo,
    pub title: String,
    pub extra_fields_html: String,
    values: FlatRecord,
}

impl OpenModal {
    fn new(tipo: TramiteTipo) -> Self {
        Self {
            tipo,
            title: format!("Solicitar: {}", tipo.title()),
            extra_fields_html: render_extra_fields(tipo),
            values: FlatRecord::new(),
        }
    }

    pub fn values(&self) -> &FlatRecord {
        &self.values
    }

    fn accepts(&self, name: &str) -> bool {
        COMMON_FIELDS
            .iter()
            .chain(extra_fields(self.tipo))
            .any(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TramiteModal {
    open: Option<OpenModal>,
}

impl TramiteModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&OpenModal> {
        self.open.as_ref()
    }

    /// Handle a "solicitar" click. Reopening discards whatever was typed before.
    pub fn open(&mut self, tipo: TramiteTipo) -> &OpenModal {
        self.open.insert(OpenModal::new(tipo))
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ModalError> {
        let open = self.open.as_mut().ok_or(ModalError::NotOpen)?;
        if !open.accepts(name) {
            return Err(ModalError::UnknownField {
                field: name.to_string(),
                tipo: open.tipo,
            });
        }
        open.values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Flat record of every field plus `tipo`.
    pub fn collect(&self) -> Result<FlatRecord, ModalError> {
        let open = self.current().ok_or(ModalError::NotOpen)?;
        let mut record = open.values.clone();
        record.insert("tipo".to_string(), open.tipo.as_str().to_string());
        Ok(record)
    }

    /// API body: common fields at the top level, the rest under `extra`.
    pub fn submission(&self) -> Result<NewTramite, ModalError> {
        let open = self.current().ok_or(ModalError::NotOpen)?;
        let common = |name: &str| open.values.get(name).cloned().unwrap_or_default();

        let extra: Map<String, Value> = open
            .values
            .iter()
            .filter(|(name, _)| !COMMON_FIELDS.iter().any(|f| f.name == name.as_str()))
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();

        Ok(NewTramite {
            tipo: Some(open.tipo.as_str().to_string()),
            nombre: Some(common("nombre")),
            documento: Some(common("documento")),
            grado: Some(common("grado")),
            extra: Some(Value::Object(extra)),
            channel: Some("web".to_string()),
        })
    }

    pub fn cancel(&mut self) {
        self.open = None;
    }

    pub fn close_after_submit(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tipo: TramiteTipo) -> Vec<&'static str> {
        extra_fields(tipo).iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_extra_fields_per_type() {
        assert_eq!(names(TramiteTipo::Inasistencia), vec!["fecha_inasistencia", "motivo"]);
        assert_eq!(names(TramiteTipo::Calificaciones), vec!["anio"]);
        assert!(names(TramiteTipo::Constancia).is_empty());
        assert!(names(TramiteTipo::PazYSalvo).is_empty());
    }

    #[test]
    fn test_inasistencia_panel_has_date_and_textarea_only() {
        let mut modal = TramiteModal::new();
        let open = modal.open(TramiteTipo::Inasistencia);

        assert!(open.extra_fields_html.contains(r#"type="date""#));
        assert!(open.extra_fields_html.contains("<textarea"));
        assert!(!open.extra_fields_html.contains(r#"name="anio""#));
        assert!(!open.extra_fields_html.contains(r#"type="number""#));
    }

    #[test]
    fn test_types_without_extras_render_empty_panel() {
        assert_eq!(render_extra_fields(TramiteTipo::Constancia), "");
        assert_eq!(render_extra_fields(TramiteTipo::PazYSalvo), "");
    }

    #[test]
    fn test_open_sets_title_and_resets_form() {
        let mut modal = TramiteModal::new();
        modal.open(TramiteTipo::Constancia);
        modal.set_field("nombre", "Ana").unwrap();

        let open = modal.open(TramiteTipo::Calificaciones);
        assert_eq!(open.title, "Solicitar: Certificado de calificaciones");
        assert!(open.values().is_empty());
    }

    #[test]
    fn test_fields_must_belong_to_form() {
        let mut modal = TramiteModal::new();
        assert_eq!(modal.set_field("nombre", "Ana"), Err(ModalError::NotOpen));

        modal.open(TramiteTipo::Constancia);
        assert!(matches!(
            modal.set_field("motivo", "x"),
            Err(ModalError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_collect_and_submission() {
        let mut modal = TramiteModal::new();
        modal.open(TramiteTipo::Inasistencia);
        modal.set_field("nombre", "Ana").unwrap();
        modal.set_field("documento", "123").unwrap();
        modal.set_field("grado", "5A").unwrap();
        modal.set_field("fecha_inasistencia", "2025-03-03").unwrap();
        modal.set_field("motivo", "Cita médica").unwrap();

        let flat = modal.collect().unwrap();
        assert_eq!(flat["tipo"], "inasistencia");
        assert_eq!(flat["motivo"], "Cita médica");

        let body = modal.submission().unwrap();
        assert_eq!(body.tipo.as_deref(), Some("inasistencia"));
        assert_eq!(body.nombre.as_deref(), Some("Ana"));
        assert_eq!(
            body.extra,
            Some(serde_json::json!({
                "fecha_inasistencia": "2025-03-03",
                "motivo": "Cita médica"
            }))
        );
    }

    #[test]
    fn test_cancel_closes() {
        let mut modal = TramiteModal::new();
        modal.open(TramiteTipo::PazYSalvo);
        modal.cancel();
        assert!(!modal.is_open());
        assert_eq!(modal.collect(), Err(ModalError::NotOpen));
    }
}
