//! Catalog entry types.

use crate::error::{CatalogError, Result};
use odin_core::ModuleId;
use serde::{Deserialize, Serialize};

/// One navigable destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable key, also used for favorites
    pub id: String,

    /// Text shown in menus and matched by search
    pub label: String,

    /// Functional area, also matched by search
    pub category: String,

    /// Navigation target
    pub path: String,

    /// Join key into the access evaluator
    pub module_id: ModuleId,

    /// Icon name
    pub icon: String,

    /// Kind of tool, for entries generated from advanced modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<ToolType>,
}

impl CatalogEntry {
    /// Create an entry.
    ///
    /// # Errors
    /// Returns error if `module_id` is not a valid module identifier.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        path: impl Into<String>,
        module_id: &str,
        icon: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            path: path.into(),
            module_id: ModuleId::new(module_id)?,
            icon: icon.into(),
            tool_type: None,
        })
    }

    /// Attach a tool type.
    #[must_use]
    pub fn with_tool_type(mut self, tool_type: ToolType) -> Self {
        self.tool_type = Some(tool_type);
        self
    }

    /// Whether the entry is visible to everyone.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.module_id.is_public()
    }

    /// Whether `needle` (already lowercased) occurs in the label or category.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }

    /// Validate the entry for completeness.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(CatalogError::ValidationError {
                entry_id: self.id.clone(),
                reason: "entry id cannot be empty".to_string(),
            });
        }

        if self.label.trim().is_empty() {
            return Err(CatalogError::ValidationError {
                entry_id: self.id.clone(),
                reason: "label cannot be empty".to_string(),
            });
        }

        if !self.path.starts_with('/') {
            return Err(CatalogError::ValidationError {
                entry_id: self.id.clone(),
                reason: format!("path must be absolute, got '{}'", self.path),
            });
        }

        Ok(())
    }
}

/// Kinds of advanced laboratory tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    /// Numeric calculator (molarity, dilution, ...)
    Calculator,
    /// Data analysis over user input (statistics, sequence alignment, ...)
    Analyzer,
    /// Plotting and image views
    Visualizer,
    /// Searchable reference table
    Database,
    /// Parameterised model run
    Simulator,
    /// Step-by-step protocol
    Protocol,
    /// Inventory or sample tracking board
    Tracker,
}

/// View mounted for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolView {
    /// Form inputs with a live result panel
    FormWithResult,
    /// Input editor with a report pane
    Workspace,
    /// Canvas with controls
    Canvas,
    /// Filterable table
    Table,
    /// Parameter sliders with a run button and chart
    RunPanel,
    /// Ordered checklist
    Checklist,
    /// Kanban-style board
    Board,
}

impl ToolType {
    /// Get a human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::Analyzer => "Analyzer",
            Self::Visualizer => "Visualizer",
            Self::Database => "Database",
            Self::Simulator => "Simulator",
            Self::Protocol => "Protocol",
            Self::Tracker => "Tracker",
        }
    }

    /// The view to mount for this kind of tool.
    #[must_use]
    pub fn view(&self) -> ToolView {
        match self {
            Self::Calculator => ToolView::FormWithResult,
            Self::Analyzer => ToolView::Workspace,
            Self::Visualizer => ToolView::Canvas,
            Self::Database => ToolView::Table,
            Self::Simulator => ToolView::RunPanel,
            Self::Protocol => ToolView::Checklist,
            Self::Tracker => ToolView::Board,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> CatalogEntry {
        CatalogEntry::new("notebook", "Lab Notebook", "Hugin Lab", path, "hugin-notebook", "book")
            .expect("valid entry")
    }

    #[test]
    fn test_validate() {
        assert!(entry("/hugin/notebook").validate().is_ok());
        assert!(matches!(
            entry("hugin/notebook").validate(),
            Err(CatalogError::ValidationError { .. })
        ));

        let mut blank = entry("/hugin/notebook");
        blank.label = "  ".to_string();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_invalid_module_id() {
        let result = CatalogEntry::new("x", "X", "Y", "/x", "has space", "icon");
        assert!(matches!(result, Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn test_matches_label_or_category() {
        let e = entry("/hugin/notebook");
        assert!(e.matches_lowercase("notebook"));
        assert!(e.matches_lowercase("hugin"));
        assert!(e.matches_lowercase("lab n"));
        assert!(!e.matches_lowercase("munin"));
    }

    #[test]
    fn test_tool_view_dispatch() {
        assert_eq!(ToolType::Calculator.view(), ToolView::FormWithResult);
        assert_eq!(ToolType::Database.view(), ToolView::Table);
        assert_eq!(ToolType::Tracker.view(), ToolView::Board);
    }

    #[test]
    fn test_entry_serialization() {
        let e = entry("/hugin/notebook").with_tool_type(ToolType::Protocol);
        let json = serde_json::to_value(&e).expect("serialize entry");
        assert_eq!(json["moduleId"], "hugin-notebook");
        assert_eq!(json["toolType"], "protocol");
    }
}
