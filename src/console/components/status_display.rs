//! Status line for backend progress, save results and link targets

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::console::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl StatusType {
    fn prefix(&self) -> &'static str {
        match self {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        }
    }

    fn style(&self) -> Style {
        match self {
            StatusType::Info => Styles::info(),
            StatusType::Success => Styles::success(),
            StatusType::Warning | StatusType::Loading => Styles::warning(),
            StatusType::Error => Styles::error(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, StatusType::Info)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, StatusType::Success)
    }

    pub fn warning(message: String) -> Self {
        Self::new(message, StatusType::Warning)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, StatusType::Error)
    }

    pub fn loading(message: String) -> Self {
        Self::new(message, StatusType::Loading)
    }
}

/// Current status message plus a bounded history
pub struct StatusDisplay {
    current_message: Option<StatusMessage>,
    message_history: Vec<StatusMessage>,
    max_history: usize,
    show_timestamp: bool,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 50,
            show_timestamp: false,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::info(message));
    }

    pub fn set_success(&mut self, message: String) {
        self.set_message(StatusMessage::success(message));
    }

    pub fn set_warning(&mut self, message: String) {
        self.set_message(StatusMessage::warning(message));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::error(message));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::loading(message));
    }

    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Text shown in the status bar
    pub fn text(&self) -> String {
        match &self.current_message {
            Some(message) => self.format_message(message),
            None => "Ready".to_string(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let style = self
            .current_message
            .as_ref()
            .map_or_else(Styles::default, |m| m.status_type.style());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(self.text()).style(style).block(block);
        f.render_widget(paragraph, area);
    }

    fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = message.status_type.prefix();
        if self.show_timestamp {
            format!(
                "{} [{}] {}",
                prefix,
                message.timestamp.format("%H:%M:%S"),
                message.message
            )
        } else {
            format!("{} {}", prefix, message.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_and_ready_state() {
        let mut status = StatusDisplay::new();
        assert_eq!(status.text(), "Ready");

        status.set_error("Failed to save record".to_string());
        assert_eq!(status.text(), "✗ Failed to save record");

        status.set_loading("Loading frameworks...".to_string());
        assert_eq!(status.text(), "⟳ Loading frameworks...");
        assert_eq!(status.get_history().len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut status = StatusDisplay::new().with_history(2);
        for i in 0..5 {
            status.set_info(format!("message {}", i));
        }
        status.clear();
        assert!(status.get_current().is_none());

        let history: Vec<&str> = status
            .get_history()
            .iter()
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(history, vec!["message 3", "message 4"]);
    }
}
