//! Function descriptors advertised to the model.
//!
//! The catalog is derived from the knowledge store on every call so the
//! `category` enum always matches the live category set.

use ai_llm_service::ToolDefinition;
use faq_knowledge::KnowledgeStore;
use serde_json::{Value, json};
use tracing::warn;

pub const FAQ_FUNCTION: &str = "get_faq_answer";
pub const STATISTICS_FUNCTION: &str = "get_organism_statistics";
pub const SEARCH_FUNCTION: &str = "search_and_list_organisms";

const CLASSIFICATIONS: [&str; 4] = ["bacteria", "fungi", "virus", "parasite"];
const NUCLEIC_ACIDS: [&str; 2] = ["DNA", "RNA"];
const INFECTION_TYPES: [&str; 3] = ["pneumonia", "meningitis", "bloodstream"];
const PATHOGENIC_LEVELS: [&str; 5] = ["H", "M", "L", "W", "D"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Advertise the two organism-table functions.
    pub expose_database_functions: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            expose_database_functions: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionCatalog {
    config: CatalogConfig,
}

impl FunctionCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> CatalogConfig {
        self.config
    }

    /// Builds the descriptor list for the current store contents.
    pub fn build(&self, store: &KnowledgeStore) -> Vec<ToolDefinition> {
        let mut tools = Vec::with_capacity(3);

        match faq_function(store) {
            Some(def) => tools.push(def),
            None => warn!("no FAQ categories available; FAQ function not advertised"),
        }

        if self.config.expose_database_functions {
            tools.push(statistics_function());
            tools.push(search_function());
        }

        if tools.is_empty() {
            warn!("function catalog is empty; every question will be out of scope");
        }
        tools
    }
}

fn faq_function(store: &KnowledgeStore) -> Option<ToolDefinition> {
    let categories = store.available_categories();
    if categories.is_empty() {
        return None;
    }

    let described = categories
        .iter()
        .map(|c| format!("'{c}' ({})", store.describe(c)))
        .collect::<Vec<_>>()
        .join(", ");

    Some(ToolDefinition::function(
        FAQ_FUNCTION,
        format!(
            "Answer business questions about {} using company FAQ knowledge base.",
            categories.join(", ")
        ),
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": categories,
                    "description": format!("FAQ category: {described}"),
                },
                "question": {
                    "type": "string",
                    "description": "The user's exact question",
                },
            },
            "required": ["category", "question"],
            "additionalProperties": false,
        }),
    ))
}

fn enum_property(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

fn statistics_function() -> ToolDefinition {
    ToolDefinition::function(
        STATISTICS_FUNCTION,
        "Get organism counts and statistics from pathogen database. Use for 'how many', 'count', 'percentage' questions.",
        json!({
            "type": "object",
            "properties": {
                "classification": enum_property(&CLASSIFICATIONS, "Filter by organism type"),
                "nucleic_acid": enum_property(&NUCLEIC_ACIDS, "For viruses only: filter by nucleic acid type"),
                "infection_type": enum_property(&INFECTION_TYPES, "Filter by infection type (use with pathogenic_level)"),
                "pathogenic_level": enum_property(
                    &PATHOGENIC_LEVELS,
                    "Pathogenic risk: H=High, M=Medium, L=Low, W=Contaminant, D=Colonizer",
                ),
            },
            "required": [],
            "additionalProperties": false,
        }),
    )
}

fn search_function() -> ToolDefinition {
    ToolDefinition::function(
        SEARCH_FUNCTION,
        "Search specific organisms OR list organisms by criteria. Use for organism profiles or listing requests.",
        json!({
            "type": "object",
            "properties": {
                "organism_name": {
                    "type": "string",
                    "description": "Specific organism name (e.g., 'Escherichia coli'). Leave empty for listing.",
                },
                "list_mode": {
                    "type": "boolean",
                    "description": "Set true for 'list all', 'show', 'display' requests",
                },
                "classification": enum_property(&CLASSIFICATIONS, "Filter by organism type"),
                "nucleic_acid": enum_property(&NUCLEIC_ACIDS, "For viruses: DNA or RNA"),
                "infection_type": enum_property(&INFECTION_TYPES, "Filter by infection type"),
                "pathogenic_level": enum_property(&PATHOGENIC_LEVELS, "Risk level (use with infection_type)"),
            },
            "required": [],
            "additionalProperties": false,
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> KnowledgeStore {
        let mut desc = HashMap::new();
        desc.insert("sales".to_string(), "pricing, contracts".to_string());
        KnowledgeStore::from_entries([("sales", "a"), ("labs", "b")], desc)
    }

    fn names(tools: &[ToolDefinition]) -> Vec<&str> {
        tools.iter().map(ToolDefinition::name).collect()
    }

    #[test]
    fn faq_enum_matches_live_categories() {
        let tools = FunctionCatalog::default().build(&store());
        assert_eq!(
            names(&tools),
            vec![FAQ_FUNCTION, STATISTICS_FUNCTION, SEARCH_FUNCTION]
        );

        let category = &tools[0].function.parameters["properties"]["category"];
        assert_eq!(category["enum"], json!(["sales", "labs"]));
        let text = category["description"].as_str().unwrap();
        assert!(text.contains("'sales' (pricing, contracts)"));
        assert!(text.contains("'labs' (labs related questions)"));
    }

    #[test]
    fn rebuilding_yields_equal_descriptors() {
        let catalog = FunctionCatalog::default();
        let s = store();
        assert_eq!(catalog.build(&s), catalog.build(&s));
    }

    #[test]
    fn empty_store_keeps_only_database_functions() {
        let tools = FunctionCatalog::default().build(&KnowledgeStore::default());
        assert_eq!(names(&tools), vec![STATISTICS_FUNCTION, SEARCH_FUNCTION]);
    }

    #[test]
    fn database_functions_can_be_hidden() {
        let catalog = FunctionCatalog::new(CatalogConfig {
            expose_database_functions: false,
        });
        assert_eq!(names(&catalog.build(&store())), vec![FAQ_FUNCTION]);
        assert!(catalog.build(&KnowledgeStore::default()).is_empty());
    }
}
