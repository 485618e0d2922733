//! Portal UI controllers
//!
//! Rendering-agnostic state for the single-page portal. Each controller owns
//! its state and exposes explicit handlers that take typed input and return
//! typed output; [`PortalController`] wires them together and talks to the
//! backend through [`crate::client::PortalClient`].

pub mod chat;
pub mod menu;
pub mod portal;
pub mod privacy;
pub mod tramite_modal;

pub use chat::*;
pub use menu::*;
pub use portal::*;
pub use privacy::*;
pub use tramite_modal::*;

/// Minimal HTML escaping for text interpolated into templates.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Ana\" & 'Luis'</b>"), "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Luis&#39;&lt;/b&gt;");
        assert_eq!(escape_html("matrícula"), "matrícula");
    }
}
