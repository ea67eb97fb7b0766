//! Domain entities: flat adjacency-list records

use serde::{Deserialize, Serialize};

/// One row of an adjacency list, as delivered by a data-fetch layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, parent: Option<&str>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(str::to_string),
            label: label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Id extractor for the converter and index.
    pub fn key(&self) -> String {
        self.id.clone()
    }

    /// Parent id extractor for the converter.
    pub fn parent_key(&self) -> Option<String> {
        self.parent.clone()
    }

    /// Label, falling back to the id when the label is blank.
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            self.id.clone()
        } else {
            self.label.clone()
        }
    }
}

/// TOML layout of a records file: a list of `[[record]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFile {
    #[serde(default, rename = "record")]
    pub records: Vec<Record>,
}
