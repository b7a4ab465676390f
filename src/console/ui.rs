//! Common UI styles and widgets for the reporting console

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn disabled() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    }

    pub fn action() -> Style {
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD)
    }

    pub fn chip() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    /// Background of an unsaved new row
    pub fn new_row() -> Style {
        Style::default().bg(Color::Rgb(20, 40, 70))
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }
}

/// Single-line text input with a character cursor
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub placeholder: String,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.char_count();
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor_position);
        self.value.insert(idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index(self.cursor_position);
            self.value.remove(idx);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let idx = self.byte_index(self.cursor_position);
            self.value.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Inline rendering for table cells; the cursor is drawn as a bar
    pub fn to_line(&self) -> Line<'static> {
        if self.value.is_empty() {
            let mut spans = Vec::new();
            if self.is_focused {
                spans.push(Span::styled("▏", Styles::title()));
            }
            spans.push(Span::styled(self.placeholder.clone(), Styles::inactive()));
            return Line::from(spans);
        }

        if !self.is_focused {
            return Line::from(self.value.clone());
        }

        let split = self.byte_index(self.cursor_position);
        let (before, after) = self.value.split_at(split);
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled("▏", Styles::title()),
            Span::raw(after.to_string()),
        ])
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display width, ending with an ellipsis when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Pad to a display width
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_field_multibyte_editing() {
        let mut input = InputField::new().with_value("Müller");
        assert_eq!(input.cursor_position, 6);

        input.move_cursor_left();
        input.move_cursor_left();
        input.insert_char('x');
        assert_eq!(input.value, "Müllxer");

        input.move_cursor_to_start();
        input.move_cursor_right();
        input.delete_char_forward();
        assert_eq!(input.value, "Mllxer");

        input.delete_char();
        assert_eq!(input.value, "llxer");
        assert_eq!(input.cursor_position, 0);
        input.delete_char();
        assert_eq!(input.value, "llxer");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("ESRS", 10), "ESRS");
        assert_eq!(truncate_to_width("Jurisdictional Report", 10), "Jurisdict…");
        assert_eq!(truncate_to_width("報告書の一覧", 7), "報告書…");
        assert_eq!(pad_to_width("GRI", 5), "GRI  ");
    }
}
