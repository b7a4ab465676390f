//! Declarative column configuration and visible-column resolution

use std::collections::HashSet;

use ratatui::layout::{Alignment, Constraint};
use thiserror::Error;

/// Semantic type of a column; drives cell rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Link,
    Custom,
    Actions,
}

/// Width hint for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    Auto,
    Fixed(u16),
    Percent(u16),
}

/// Link rendering hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Path to an explicit href inside the record
    pub href_path: Option<String>,
    /// Base of the synthesized detail link, `<base>/<id>`
    pub detail_base: String,
}

/// Chip rendering hints for custom columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipConfig {
    /// Path to the label inside each chip item
    pub label_path: String,
    /// Path to an optional link inside each chip item
    pub link_path: Option<String>,
    /// Chips shown before collapsing into "+N more"
    pub max_visible: usize,
}

impl ChipConfig {
    pub fn new(label_path: &str) -> Self {
        Self {
            label_path: label_path.to_string(),
            link_path: None,
            max_visible: 3,
        }
    }

    pub fn with_link_path(mut self, link_path: &str) -> Self {
        self.link_path = Some(link_path.to_string());
        self
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConfig {
    pub field: String,
    pub path: String,
    pub column_type: ColumnType,
    pub label: String,
    pub sortable: bool,
    pub default_visible: bool,
    pub group: Option<String>,
    pub order: Option<u32>,
    pub width: ColumnWidth,
    pub align: Option<Alignment>,
    pub wide: bool,
    /// Renders the 1-based row position instead of a record value
    pub row_index: bool,
    /// Column holding the inline-edit input
    pub editable: bool,
    pub link: Option<LinkConfig>,
    pub chips: Option<ChipConfig>,
    pub fallback_label: Option<String>,
}

impl ColumnConfig {
    pub fn new(field: &str, path: &str, column_type: ColumnType, label: &str) -> Self {
        Self {
            field: field.to_string(),
            path: path.to_string(),
            column_type,
            label: label.to_string(),
            sortable: false,
            default_visible: true,
            group: None,
            order: None,
            width: ColumnWidth::Auto,
            align: None,
            wide: false,
            row_index: false,
            editable: false,
            link: None,
            chips: None,
            fallback_label: None,
        }
    }

    pub fn text(field: &str, path: &str, label: &str) -> Self {
        Self::new(field, path, ColumnType::Text, label)
    }

    pub fn number(field: &str, path: &str, label: &str) -> Self {
        Self::new(field, path, ColumnType::Number, label)
    }

    pub fn date(field: &str, path: &str, label: &str) -> Self {
        Self::new(field, path, ColumnType::Date, label)
    }

    /// 1-based position column
    pub fn row_index(field: &str, label: &str) -> Self {
        let mut column = Self::new(field, field, ColumnType::Number, label);
        column.row_index = true;
        column
    }

    pub fn actions(field: &str, label: &str) -> Self {
        Self::new(field, field, ColumnType::Actions, label).align(Alignment::Center)
    }

    pub fn link(field: &str, path: &str, label: &str, link: LinkConfig) -> Self {
        let mut column = Self::new(field, path, ColumnType::Link, label);
        column.link = Some(link);
        column
    }

    pub fn custom(field: &str, path: &str, label: &str) -> Self {
        Self::new(field, path, ColumnType::Custom, label)
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn wide(mut self) -> Self {
        self.wide = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn with_chips(mut self, chips: ChipConfig) -> Self {
        self.chips = Some(chips);
        self
    }

    pub fn with_fallback(mut self, label: &str) -> Self {
        self.fallback_label = Some(label.to_string());
        self
    }

    /// Layout constraint used by the table widget
    pub fn constraint(&self) -> Constraint {
        if self.wide {
            return Constraint::Length(28);
        }
        match self.width {
            ColumnWidth::Fixed(cells) => Constraint::Length(cells),
            ColumnWidth::Percent(pct) => Constraint::Percentage(pct),
            ColumnWidth::Auto => Constraint::Min(12),
        }
    }

    pub fn alignment(&self) -> Alignment {
        self.align.unwrap_or(Alignment::Left)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate column field '{0}'")]
    DuplicateField(String),

    #[error("Link column '{0}' has no link configuration")]
    MissingLink(String),

    #[error("Custom column '{0}' needs chip or fallback configuration")]
    MissingCustomRender(String),

    #[error("More than one editable column: '{0}' and '{1}'")]
    MultipleEditable(String, String),
}

/// Validated set of column configurations
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn new(columns: Vec<ColumnConfig>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut editable: Option<&str> = None;

        for column in &columns {
            if !seen.insert(column.field.as_str()) {
                return Err(ConfigError::DuplicateField(column.field.clone()));
            }
            match column.column_type {
                ColumnType::Link if column.link.is_none() => {
                    return Err(ConfigError::MissingLink(column.field.clone()));
                }
                ColumnType::Custom if column.chips.is_none() && column.fallback_label.is_none() => {
                    return Err(ConfigError::MissingCustomRender(column.field.clone()));
                }
                _ => {}
            }
            if column.editable {
                if let Some(first) = editable {
                    return Err(ConfigError::MultipleEditable(
                        first.to_string(),
                        column.field.clone(),
                    ));
                }
                editable = Some(column.field.as_str());
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn find(&self, field: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Ordered, visible subset of the columns.
    ///
    /// With an explicit display list a column is shown when its key is listed
    /// or when it carries no group. Without one, only default-visible columns
    /// are shown. The result is ordered by `order`; unordered columns follow
    /// all ordered ones and keep their input order.
    pub fn resolve(&self, display: Option<&[String]>) -> Vec<&ColumnConfig> {
        let mut visible: Vec<&ColumnConfig> = self
            .columns
            .iter()
            .filter(|column| match display {
                Some(keys) => column.group.is_none() || keys.iter().any(|k| *k == column.field),
                None => column.default_visible,
            })
            .collect();

        visible.sort_by_key(|column| column.order.map_or((1, 0), |order| (0, order)));
        visible
    }
}
