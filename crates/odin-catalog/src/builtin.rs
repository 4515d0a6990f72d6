//! The catalog shipped with the application.

use crate::advanced::{AdvancedModule, AdvancedTool};
use crate::entry::{CatalogEntry, ToolType};
use crate::error::Result;
use crate::registry::CatalogRegistry;

/// `(id, label, category, path, module_id, icon)`
type EntryRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

/// Gated destinations, grouped by functional area.
const STATIC_ENTRIES: &[EntryRow] = &[
    // Hugin: laboratory management
    ("hugin", "Hugin Dashboard", "Hugin Lab", "/hugin", "hugin", "layout-dashboard"),
    ("hugin-notebook", "Lab Notebook", "Hugin Lab", "/hugin/notebook", "hugin-notebook", "book-open"),
    ("hugin-inventory", "Inventory", "Hugin Lab", "/hugin/inventory", "hugin-inventory", "package"),
    ("hugin-planning", "Planning", "Hugin Lab", "/hugin/planning", "hugin-planning", "calendar"),
    ("hugin-protocols", "Protocols", "Hugin Lab", "/hugin/protocols", "hugin-protocols", "clipboard-list"),
    ("hugin-equipment", "Equipment Booking", "Hugin Lab", "/hugin/equipment", "hugin-equipment", "microscope"),
    ("hugin-samples", "Sample Registry", "Hugin Lab", "/hugin/samples", "hugin-samples", "test-tube"),
    ("hugin-documents", "Documents", "Hugin Lab", "/hugin/documents", "hugin-documents", "folder"),
    // Munin: scientific knowledge base
    ("munin", "Munin Atlas", "Munin Knowledge", "/munin", "munin", "globe"),
    ("munin-compare", "Compare Entities", "Munin Knowledge", "/munin/compare", "munin-compare", "columns"),
    ("munin-glossary", "Scientific Glossary", "Munin Knowledge", "/munin/glossary", "munin-glossary", "book-a"),
    // Immersion demo
    ("immersion", "Immersion Lab", "Immersion", "/immersion", "immersion", "glasses"),
];

/// Public utility pages, all sharing the `"any"` module.
const GENERAL_ENTRIES: &[EntryRow] = &[
    ("home", "Home", "General", "/", "any", "home"),
    ("settings", "Settings", "General", "/settings", "any", "settings"),
    ("account", "Account", "General", "/account", "any", "user"),
    ("pricing", "Plans & Pricing", "General", "/pricing", "any", "credit-card"),
    ("help", "Help Center", "General", "/help", "any", "life-buoy"),
];

fn tool(id: &str, name: &str, tool_type: ToolType, description: &str) -> AdvancedTool {
    AdvancedTool {
        id: id.to_string(),
        name: name.to_string(),
        tool_type,
        description: description.to_string(),
    }
}

fn module(id: &str, name: &str, icon: &str, tools: Vec<AdvancedTool>) -> AdvancedModule {
    AdvancedModule {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        tools,
    }
}

/// Advanced modules in display order.
#[must_use]
pub fn advanced_modules() -> Vec<AdvancedModule> {
    vec![
        module(
            "molecular-biology",
            "Molecular Biology",
            "dna",
            vec![
                tool("pcr-designer", "PCR Primer Designer", ToolType::Calculator, "Melting temperature and GC content for primer pairs"),
                tool("sequence-search", "Sequence Similarity Search", ToolType::Analyzer, "Illustrative local alignment against a demo sequence set"),
                tool("plasmid-map", "Plasmid Map", ToolType::Visualizer, "Circular map of features and restriction sites"),
            ],
        ),
        module(
            "biostatistics",
            "Biostatistics",
            "chart-bar",
            vec![
                tool("t-test", "Student's t-test", ToolType::Analyzer, "Compare the means of two samples"),
                tool("power", "Power Analysis", ToolType::Calculator, "Sample size for a target statistical power"),
            ],
        ),
        module(
            "chemistry",
            "Chemistry",
            "flask-conical",
            vec![
                tool("molarity", "Molarity Calculator", ToolType::Calculator, "Mass, volume and concentration conversions"),
                tool("buffer-prep", "Buffer Preparation", ToolType::Protocol, "Step-by-step buffer recipes"),
                tool("reagents", "Reagent Database", ToolType::Database, "Hazards and storage conditions of common reagents"),
            ],
        ),
        module(
            "imaging",
            "Imaging",
            "image",
            vec![
                tool("image-filters", "Image Filters", ToolType::Visualizer, "Contrast, threshold and edge filters"),
                tool("colony-counter", "Colony Counter", ToolType::Analyzer, "Count colonies on a plate photograph"),
            ],
        ),
        module(
            "lab-operations",
            "Lab Operations",
            "boxes",
            vec![
                tool("sample-tracker", "Sample Tracker", ToolType::Tracker, "Follow samples through processing stages"),
                tool("growth-simulator", "Growth Simulator", ToolType::Simulator, "Logistic growth of a bacterial culture"),
            ],
        ),
    ]
}

fn rows_to_entries(rows: &[EntryRow]) -> Result<Vec<CatalogEntry>> {
    rows.iter()
        .map(|&(id, label, category, path, module_id, icon)| {
            CatalogEntry::new(id, label, category, path, module_id, icon)
        })
        .collect()
}

/// Build the shipped registry: static entries, then advanced tools, then
/// general pages.
///
/// # Errors
/// Returns error if the shipped tables violate registry invariants.
pub fn builtin_registry() -> Result<CatalogRegistry> {
    CatalogRegistry::builder()
        .static_entries(rows_to_entries(STATIC_ENTRIES)?)
        .advanced_modules(advanced_modules())
        .general_entries(rows_to_entries(GENERAL_ENTRIES)?)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = builtin_registry().expect("builtin registry");
        let tools: usize = advanced_modules().iter().map(|m| m.tools.len()).sum();
        assert_eq!(
            registry.count(),
            STATIC_ENTRIES.len() + tools + GENERAL_ENTRIES.len()
        );
    }

    #[test]
    fn test_builtin_order() {
        let registry = builtin_registry().expect("builtin registry");
        let ids: Vec<&str> = registry.entries().iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids.first(), Some(&"hugin"));
        assert_eq!(ids.last(), Some(&"help"));

        let first_tool = ids
            .iter()
            .position(|id| id.starts_with("adv-"))
            .expect("advanced tools present");
        assert_eq!(first_tool, STATIC_ENTRIES.len());
        assert_eq!(ids[first_tool], "adv-molecular-biology-pcr-designer");
    }

    #[test]
    fn test_home_is_public() {
        let registry = builtin_registry().expect("builtin registry");
        let home = registry.get("home").expect("home entry");
        assert!(home.is_public());
    }
}
