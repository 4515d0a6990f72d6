//! Advanced laboratory modules.
//!
//! An advanced module groups several tools. Each tool becomes its own
//! catalog entry, gated by its own module id.

use crate::entry::{CatalogEntry, ToolType};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A group of related advanced tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedModule {
    /// Module slug, e.g. `"molecular-biology"`
    pub id: String,
    /// Display name, used as the category of generated entries
    pub name: String,
    /// Icon shared by the module's tools
    pub icon: String,
    /// Tools in display order
    pub tools: Vec<AdvancedTool>,
}

/// One tool inside an advanced module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedTool {
    /// Tool slug, unique within its module
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of tool, selects the mounted view
    pub tool_type: ToolType,
    /// Short description
    pub description: String,
}

impl AdvancedModule {
    /// Catalog id (and gated module id) of one of this module's tools.
    #[must_use]
    pub fn tool_entry_id(&self, tool: &AdvancedTool) -> String {
        format!("adv-{}-{}", self.id, tool.id)
    }

    /// Expand into one catalog entry per tool, in tool order.
    ///
    /// # Errors
    /// Returns error if a generated module id is invalid.
    pub fn catalog_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.tools
            .iter()
            .map(|tool| {
                let entry_id = self.tool_entry_id(tool);
                Ok(CatalogEntry::new(
                    entry_id.clone(),
                    tool.name.clone(),
                    self.name.clone(),
                    format!("/advanced/{}/{}", self.id, tool.id),
                    &entry_id,
                    self.icon.clone(),
                )?
                .with_tool_type(tool.tool_type))
            })
            .collect()
    }
}
