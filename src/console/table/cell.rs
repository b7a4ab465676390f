//! Per-cell rendering driven by the column type

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::columns::{ChipConfig, ColumnConfig, ColumnType};
use crate::console::ui::Styles;

pub const PLACEHOLDER: &str = "-";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// A label rendered inside a custom column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub link: Option<String>,
}

/// Renderable value of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Placeholder,
    Index(usize),
    Number(String),
    Date(String),
    Text(String),
    Link {
        label: String,
        target: String,
        new_context: bool,
    },
    Chips {
        chips: Vec<Chip>,
        overflow: usize,
    },
    Fallback(String),
    EditAction,
}

impl CellContent {
    /// Plain single-line text of the cell
    pub fn display(&self) -> String {
        match self {
            CellContent::Placeholder => PLACEHOLDER.to_string(),
            CellContent::Index(n) => n.to_string(),
            CellContent::Number(s) | CellContent::Date(s) | CellContent::Text(s) => s.clone(),
            CellContent::Link { label, .. } => label.clone(),
            CellContent::Chips { chips, overflow } => {
                let mut parts: Vec<String> =
                    chips.iter().map(|chip| format!("[{}]", chip.label)).collect();
                if *overflow > 0 {
                    parts.push(format!("+{} more", overflow));
                }
                parts.join(" ")
            }
            CellContent::Fallback(label) => format!("[{}]", label),
            CellContent::EditAction => "[✎ Edit]".to_string(),
        }
    }

    /// Full value shown in the detail line for the selected cell
    pub fn title(&self) -> Option<String> {
        match self {
            CellContent::Text(s) => Some(s.clone()),
            CellContent::Link {
                label,
                target,
                new_context,
            } => Some(if *new_context {
                format!("{} -> {} (new window)", label, target)
            } else {
                format!("{} -> {}", label, target)
            }),
            CellContent::Chips { chips, .. } => Some(
                chips
                    .iter()
                    .map(|chip| chip.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    /// Whether activating the cell does something
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            CellContent::Link { .. } | CellContent::Fallback(_) | CellContent::EditAction
        ) || matches!(self, CellContent::Chips { chips, .. } if chips.iter().any(|c| c.link.is_some()))
    }

    pub fn to_line(&self, alignment: Alignment) -> Line<'static> {
        let line = match self {
            CellContent::Placeholder => Line::from(Span::styled(PLACEHOLDER, Styles::inactive())),
            CellContent::Link { label, .. } => Line::from(Span::styled(
                label.clone(),
                Styles::info().add_modifier(Modifier::UNDERLINED),
            )),
            CellContent::Chips { chips, overflow } => {
                let mut spans = Vec::new();
                for chip in chips {
                    if !spans.is_empty() {
                        spans.push(Span::raw(" "));
                    }
                    let style = if chip.link.is_some() {
                        Styles::chip().add_modifier(Modifier::UNDERLINED)
                    } else {
                        Styles::chip()
                    };
                    spans.push(Span::styled(format!(" {} ", chip.label), style));
                }
                if *overflow > 0 {
                    spans.push(Span::styled(format!(" +{} more", overflow), Styles::inactive()));
                }
                Line::from(spans)
            }
            CellContent::Fallback(_) | CellContent::EditAction => {
                Line::from(Span::styled(self.display(), Styles::action()))
            }
            _ => Line::from(Span::styled(self.display(), Style::default())),
        };
        line.alignment(alignment)
    }
}

/// Serialize a record for path lookup
pub fn record_value<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or_else(|e| {
        warn!("Failed to serialize record for rendering: {}", e);
        Value::Null
    })
}

/// Resolve a dotted path; numeric segments index into arrays
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Null, missing, false, zero and empty strings are falsy
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Render one cell of a record at `position` in the rendered sequence
pub fn render_cell(record: &Value, column: &ColumnConfig, position: usize) -> CellContent {
    if column.row_index {
        return CellContent::Index(position + 1);
    }

    let value = lookup(record, &column.path);

    match column.column_type {
        ColumnType::Actions => CellContent::EditAction,
        ColumnType::Number => match value {
            _ if is_falsy(value) => CellContent::Number("0".to_string()),
            Some(v) => CellContent::Number(scalar_text(v)),
            None => CellContent::Number("0".to_string()),
        },
        ColumnType::Custom => render_custom(value, column),
        _ if is_falsy(value) => CellContent::Placeholder,
        ColumnType::Date => match value {
            Some(v) => CellContent::Date(format_date(v)),
            None => CellContent::Placeholder,
        },
        ColumnType::Link => render_link(record, value, column),
        ColumnType::Text => match value {
            Some(v) => CellContent::Text(single_line(&scalar_text(v))),
            None => CellContent::Placeholder,
        },
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn single_line(text: &str) -> String {
    text.split(['\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locale date string; unparseable input is shown as given
pub fn format_date(value: &Value) -> String {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| n.to_string()),
        Value::String(s) => parse_date(s)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| s.clone()),
        other => scalar_text(other),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    ["%Y-%m-%d", DATE_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn render_link(record: &Value, value: Option<&Value>, column: &ColumnConfig) -> CellContent {
    let label = value.map(scalar_text).unwrap_or_default();
    let Some(link) = column.link.as_ref() else {
        return CellContent::Text(label);
    };

    let explicit = link
        .href_path
        .as_deref()
        .and_then(|path| lookup(record, path))
        .and_then(Value::as_str)
        .filter(|href| !href.is_empty());

    match explicit {
        Some(href) => CellContent::Link {
            label,
            target: href.to_string(),
            new_context: true,
        },
        None => {
            let id = lookup(record, "id").map(scalar_text).unwrap_or_default();
            CellContent::Link {
                label,
                target: format!("{}/{}", link.detail_base.trim_end_matches('/'), id),
                new_context: false,
            }
        }
    }
}

fn render_custom(value: Option<&Value>, column: &ColumnConfig) -> CellContent {
    if let (Some(chip_config), Some(value)) = (column.chips.as_ref(), value) {
        let chips = collect_chips(value, chip_config);
        if !chips.is_empty() {
            let max = chip_config.max_visible.max(1);
            let overflow = chips.len().saturating_sub(max);
            return CellContent::Chips {
                chips: chips.into_iter().take(max).collect(),
                overflow,
            };
        }
    }

    match column.fallback_label.as_ref() {
        Some(label) => CellContent::Fallback(label.clone()),
        None => CellContent::Placeholder,
    }
}

fn collect_chips(value: &Value, config: &ChipConfig) -> Vec<Chip> {
    let to_chip = |item: &Value| -> Option<Chip> {
        let label = lookup(item, &config.label_path)
            .filter(|v| !is_falsy(Some(v)))
            .map(scalar_text)?;
        let link = config
            .link_path
            .as_deref()
            .and_then(|path| lookup(item, path))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(Chip { label, link })
    };

    match value {
        Value::Array(items) => items.iter().filter_map(to_chip).collect(),
        Value::Object(_) => to_chip(value).into_iter().collect(),
        _ => Vec::new(),
    }
}
