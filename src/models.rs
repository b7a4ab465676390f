use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two reference datasets managed by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Frameworks,
    Destinations,
}

impl DatasetKind {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetKind::Frameworks => "frameworks",
            DatasetKind::Destinations => "destinations",
        }
    }

    /// REST collection segment used by the HTTP backend
    pub fn collection(&self) -> &str {
        match self {
            DatasetKind::Frameworks => "reporting-frameworks",
            DatasetKind::Destinations => "report-destinations",
        }
    }

    /// Dialog title
    pub fn title(&self) -> &str {
        match self {
            DatasetKind::Frameworks => "Manage Reporting Frameworks",
            DatasetKind::Destinations => "Manage Report Destinations",
        }
    }

    /// Singular record label, used for the name column header
    pub fn record_label(&self) -> &str {
        match self {
            DatasetKind::Frameworks => "Reporting Framework",
            DatasetKind::Destinations => "Report Destination",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frameworks" | "framework" | "rf" => Ok(DatasetKind::Frameworks),
            "destinations" | "destination" | "rd" => Ok(DatasetKind::Destinations),
            other => Err(format!(
                "unknown dataset '{}': expected 'frameworks' or 'destinations'",
                other
            )),
        }
    }
}

/// Record as exchanged with the backend, shared by both datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub associated_active_rfe: u32,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default)]
    pub updated_on: String,
}

/// Body of create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameDraft {
    pub name: String,
}

impl NameDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Minimal capability set the generic table and store rely on.
///
/// Records serialize to JSON so that column data paths can be resolved
/// against them without knowing the concrete type.
pub trait ReferenceRecord: Clone + Serialize + From<RecordPayload> + Send + 'static {
    const KIND: DatasetKind;

    /// New, editing record with an empty name and a temporary identifier
    fn draft(temp_id: String) -> Self;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn associated_count(&self) -> u32;
    fn is_new(&self) -> bool;
    fn is_editing(&self) -> bool;
    fn set_editing(&mut self, editing: bool);

    /// Clear both transient flags after the backend accepted the record
    fn mark_persisted(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingFramework {
    pub id: String,
    pub name: String,
    pub associated_active_rfe: u32,
    pub updated_by: String,
    pub updated_on: String,
    pub is_new: bool,
    pub is_editing: bool,
}

impl From<RecordPayload> for ReportingFramework {
    fn from(payload: RecordPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            associated_active_rfe: payload.associated_active_rfe,
            updated_by: payload.updated_by,
            updated_on: payload.updated_on,
            is_new: false,
            is_editing: false,
        }
    }
}

impl ReferenceRecord for ReportingFramework {
    const KIND: DatasetKind = DatasetKind::Frameworks;

    fn draft(temp_id: String) -> Self {
        Self {
            id: temp_id,
            name: String::new(),
            associated_active_rfe: 0,
            updated_by: String::new(),
            updated_on: String::new(),
            is_new: true,
            is_editing: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn associated_count(&self) -> u32 {
        self.associated_active_rfe
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.is_editing = editing;
    }

    fn mark_persisted(&mut self) {
        self.is_new = false;
        self.is_editing = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDestination {
    pub id: String,
    pub name: String,
    pub associated_active_rfe: u32,
    pub updated_by: String,
    pub updated_on: String,
    pub is_new: bool,
    pub is_editing: bool,
}

impl From<RecordPayload> for ReportDestination {
    fn from(payload: RecordPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            associated_active_rfe: payload.associated_active_rfe,
            updated_by: payload.updated_by,
            updated_on: payload.updated_on,
            is_new: false,
            is_editing: false,
        }
    }
}

impl ReferenceRecord for ReportDestination {
    const KIND: DatasetKind = DatasetKind::Destinations;

    fn draft(temp_id: String) -> Self {
        Self {
            id: temp_id,
            name: String::new(),
            associated_active_rfe: 0,
            updated_by: String::new(),
            updated_on: String::new(),
            is_new: true,
            is_editing: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn associated_count(&self) -> u32 {
        self.associated_active_rfe
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.is_editing = editing;
    }

    fn mark_persisted(&mut self) {
        self.is_new = false;
        self.is_editing = false;
    }
}
