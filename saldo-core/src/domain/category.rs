//! Category domain model

use serde::{Deserialize, Serialize};

use super::transaction::EntryType;

/// Label attached to transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, entry_type: EntryType, icon: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            entry_type,
            icon: icon.into(),
        }
    }

    /// Name and icon can change; the type is fixed once created
    pub fn apply_patch(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("category name cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
}
