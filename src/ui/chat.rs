//! Chat window state and bubble templates

use chrono::{Local, NaiveTime, Timelike};

use super::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub sent_at: NaiveTime,
}

/// 12-hour clock with Spanish meridiem markers, e.g. `2:05 p. m.`.
pub fn format_time(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    let meridiem = if is_pm { "p. m." } else { "a. m." };
    format!("{}:{:02} {}", hour, time.minute(), meridiem)
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender, sent_at: NaiveTime) -> Self {
        Self {
            text: text.into(),
            sender,
            sent_at,
        }
    }

    pub fn timestamp(&self) -> String {
        format_time(self.sent_at)
    }

    /// Bubble markup appended to the chat window.
    pub fn render_html(&self) -> String {
        let text = escape_html(&self.text);
        match self.sender {
            Sender::User => format!(
                "<div class=\"message user-message\">\n  {}\n  <span class=\"timestamp\">{}</span>\n</div>",
                text,
                self.timestamp()
            ),
            Sender::Bot => format!(
                "<div class=\"message bot-message\">\n  <div class=\"bot-avatar\">🤖</div>\n  <div class=\"bubble\">\n    {}\n    <span class=\"timestamp\">{}</span>\n  </div>\n</div>",
                text,
                self.timestamp()
            ),
        }
    }
}

/// Messages shown in the chat window for this session; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    messages: Vec<ChatMessage>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Accept raw input from the text box. Blank input is ignored; otherwise the
    /// trimmed text is added as a user bubble and returned for the reply cycle.
    pub fn submit_input(&mut self, raw: &str) -> Option<String> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        self.messages
            .push(ChatMessage::new(text, Sender::User, Local::now().time()));
        Some(text.to_string())
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.messages
            .push(ChatMessage::new(text, Sender::Bot, Local::now().time()));
        &self.messages[self.messages.len() - 1]
    }

    /// The whole window, oldest bubble first.
    pub fn render_html(&self) -> String {
        self.messages
            .iter()
            .map(ChatMessage::render_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(at(14, 5)), "2:05 p. m.");
        assert_eq!(format_time(at(0, 30)), "12:30 a. m.");
        assert_eq!(format_time(at(12, 0)), "12:00 p. m.");
        assert_eq!(format_time(at(9, 41)), "9:41 a. m.");
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut panel = ChatPanel::new();
        assert_eq!(panel.submit_input("   "), None);
        assert!(panel.messages().is_empty());
    }

    #[test]
    fn test_input_is_trimmed() {
        let mut panel = ChatPanel::new();
        assert_eq!(panel.submit_input("  hola \n").as_deref(), Some("hola"));
        assert_eq!(panel.messages()[0].sender, Sender::User);
        assert_eq!(panel.messages()[0].text, "hola");
    }

    #[test]
    fn test_bubble_templates() {
        let user = ChatMessage::new("<hola>", Sender::User, at(8, 0));
        let html = user.render_html();
        assert!(html.contains("user-message"));
        assert!(html.contains("&lt;hola&gt;"));
        assert!(html.contains("8:00 a. m."));

        let bot = ChatMessage::new("respuesta", Sender::Bot, at(15, 20));
        let html = bot.render_html();
        assert!(html.contains("bot-avatar"));
        assert!(html.contains("3:20 p. m."));
    }
}
