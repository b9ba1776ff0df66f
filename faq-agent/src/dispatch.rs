//! Local execution of model-selected functions.

use ai_llm_service::ToolCall;
use faq_knowledge::KnowledgeStore;
use organism_db::{OrganismFilter, OrganismTable, SearchResult, StatsResult, empty_as_none};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    catalog::{FAQ_FUNCTION, SEARCH_FUNCTION, STATISTICS_FUNCTION},
    errors::InvocationError,
};

/// Successful result of one function call, serialized back to the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FunctionOutput {
    #[serde(rename = "faq")]
    Faq { category: String, content: String },
    #[serde(rename = "database_statistics")]
    Statistics { statistics: StatsResult },
    #[serde(rename = "organism_search_and_list")]
    Search { result: SearchResult },
}

/// A selected call paired with what running it produced.
#[derive(Debug)]
pub struct Invocation {
    pub call: ToolCall,
    pub outcome: Result<FunctionOutput, InvocationError>,
}

impl Invocation {
    /// JSON text replayed to the model as the tool turn content.
    pub fn payload(&self) -> String {
        let encoded = match &self.outcome {
            Ok(output) => serde_json::to_string(output).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        encoded.unwrap_or_else(|error| json!({ "error": error }).to_string())
    }
}

#[derive(Debug, Deserialize)]
struct FaqArgs {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    #[serde(default, deserialize_with = "empty_as_none")]
    organism_name: Option<String>,
    #[serde(default)]
    list_mode: Option<bool>,
    #[serde(flatten)]
    filter: OrganismFilter,
}

/// Runs every call in order. Failures are captured per call.
pub fn execute_all(
    calls: &[ToolCall],
    knowledge: &KnowledgeStore,
    organisms: &OrganismTable,
) -> Vec<Invocation> {
    calls
        .iter()
        .map(|call| {
            let outcome = execute(call, knowledge, organisms);
            match &outcome {
                Ok(_) => info!(function = %call.function.name, id = %call.id, "function executed"),
                Err(e) => warn!(function = %call.function.name, id = %call.id, error = %e, "function failed"),
            }
            Invocation {
                call: call.clone(),
                outcome,
            }
        })
        .collect()
}

fn execute(
    call: &ToolCall,
    knowledge: &KnowledgeStore,
    organisms: &OrganismTable,
) -> Result<FunctionOutput, InvocationError> {
    let raw = call.function.arguments.trim();
    let raw = if raw.is_empty() { "{}" } else { raw };

    match call.function.name.as_str() {
        FAQ_FUNCTION => {
            let args: FaqArgs = serde_json::from_str(raw)?;
            faq_answer(args, knowledge)
        }
        STATISTICS_FUNCTION => {
            let filter: OrganismFilter = serde_json::from_str(raw)?;
            Ok(FunctionOutput::Statistics {
                statistics: organisms.statistics(&filter),
            })
        }
        SEARCH_FUNCTION => {
            let args: SearchArgs = serde_json::from_str(raw)?;
            let result = organisms.search_or_list(
                args.organism_name.as_deref(),
                args.list_mode.unwrap_or(false),
                &args.filter,
            )?;
            Ok(FunctionOutput::Search { result })
        }
        other => Err(InvocationError::UnknownFunction(other.to_string())),
    }
}

fn faq_answer(args: FaqArgs, knowledge: &KnowledgeStore) -> Result<FunctionOutput, InvocationError> {
    let category = args.category.unwrap_or_default();
    if category.is_empty() || !knowledge.is_valid(&category) {
        return Err(InvocationError::InvalidCategory {
            category,
            available: knowledge
                .available_categories()
                .into_iter()
                .map(String::from)
                .collect(),
        });
    }

    let content = knowledge.get_content(&category);
    if content.trim().is_empty() {
        return Err(InvocationError::FaqNotFound(category));
    }

    Ok(FunctionOutput::Faq {
        content: content.to_string(),
        category,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use serde_json::Value;

    fn knowledge() -> KnowledgeStore {
        KnowledgeStore::from_entries([("sales", "Prices vary."), ("reports", "  ")], HashMap::new())
    }

    fn organisms() -> OrganismTable {
        OrganismTable::from_reader(
            "classification,nucleic_acid,organism_name,pneumonia_level,meningitis_level,bloodstream_level\n\
             virus,RNA,Influenza A virus,H,L,L\n"
                .as_bytes(),
        )
        .unwrap()
    }

    fn run(name: &str, args: &str) -> Result<FunctionOutput, InvocationError> {
        execute(&ToolCall::function("c1", name, args), &knowledge(), &organisms())
    }

    #[test]
    fn faq_success() {
        let out = run(FAQ_FUNCTION, r#"{"category":"sales","question":"price?"}"#).unwrap();
        assert_eq!(
            out,
            FunctionOutput::Faq {
                category: "sales".into(),
                content: "Prices vary.".into()
            }
        );
    }

    #[test]
    fn faq_unknown_category() {
        let err = run(FAQ_FUNCTION, r#"{"category":"legal"}"#).unwrap_err();
        assert!(matches!(err, InvocationError::InvalidCategory { .. }));
    }

    #[test]
    fn faq_blank_content_is_not_found() {
        let err = run(FAQ_FUNCTION, r#"{"category":"reports"}"#).unwrap_err();
        assert!(matches!(err, InvocationError::FaqNotFound(c) if c == "reports"));
    }

    #[test]
    fn malformed_arguments_are_captured() {
        let err = run(STATISTICS_FUNCTION, "{not json").unwrap_err();
        assert!(matches!(err, InvocationError::MalformedArguments(_)));
    }

    #[test]
    fn unknown_function_is_captured() {
        let err = run("delete_everything", "{}").unwrap_err();
        assert_eq!(err.to_string(), "Unknown function: delete_everything");
    }

    #[test]
    fn search_requires_name_outside_list_mode() {
        let err = run(SEARCH_FUNCTION, r#"{"organism_name":""}"#).unwrap_err();
        assert!(matches!(err, InvocationError::Database(_)));
    }

    #[test]
    fn search_with_flattened_filters() {
        let out = run(
            SEARCH_FUNCTION,
            r#"{"list_mode":true,"classification":"virus","nucleic_acid":"RNA"}"#,
        )
        .unwrap();
        let FunctionOutput::Search {
            result: SearchResult::OrganismList(list),
        } = out
        else {
            panic!("expected a listing");
        };
        assert_eq!(list.total_count, 1);
    }

    #[test]
    fn payload_is_json_either_way() {
        let ok = Invocation {
            call: ToolCall::function("a", STATISTICS_FUNCTION, "{}"),
            outcome: run(STATISTICS_FUNCTION, "{}"),
        };
        let v: Value = serde_json::from_str(&ok.payload()).unwrap();
        assert_eq!(v["type"], "database_statistics");
        assert_eq!(v["statistics"]["total_count"], 1);

        let failed = Invocation {
            call: ToolCall::function("b", "nope", "{}"),
            outcome: run("nope", "{}"),
        };
        let v: Value = serde_json::from_str(&failed.payload()).unwrap();
        assert_eq!(v["error"], "Unknown function: nope");
    }
}
