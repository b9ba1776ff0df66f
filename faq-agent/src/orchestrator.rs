//! Two-pass function-calling protocol.
//!
//! 1. Selection: the model sees the question and the current catalog and
//!    picks zero or more functions.
//! 2. Execution: each selected call runs locally, in model order; failures
//!    are captured per call.
//! 3. Synthesis: the question, the calls and their results are replayed to
//!    the model, which writes the final answer.
//!
//! The response category comes from the first successful call.

use std::{sync::Arc, time::Instant};

use ai_llm_service::{ChatMessage, ToolCall, ToolCallingModel};
use faq_knowledge::KnowledgeStore;
use organism_db::OrganismTable;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    catalog::FunctionCatalog,
    dispatch::{FunctionOutput, Invocation, execute_all},
    errors::{AgentError, Result},
    prompts::{OUT_OF_SCOPE_ANSWER, SELECTION_SYSTEM_PROMPT, SYNTHESIS_SYSTEM_PROMPT},
};

pub const DATABASE_STATS_CATEGORY: &str = "database_stats";
pub const OUT_OF_SCOPE_CATEGORY: &str = "out_of_scope";

/// Final answer of one orchestration call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatResult {
    pub answer: String,
    pub category: String,
    pub conversation_id: String,
    /// Seconds, millisecond precision.
    pub processing_time: f64,
}

#[derive(Clone)]
pub struct Orchestrator {
    model: Arc<dyn ToolCallingModel>,
    knowledge: Arc<KnowledgeStore>,
    organisms: Arc<OrganismTable>,
    catalog: FunctionCatalog,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn ToolCallingModel>,
        knowledge: Arc<KnowledgeStore>,
        organisms: Arc<OrganismTable>,
        catalog: FunctionCatalog,
    ) -> Self {
        Self {
            model,
            knowledge,
            organisms,
            catalog,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn organisms(&self) -> &OrganismTable {
        &self.organisms
    }

    /// Answers `question`. Stateless across calls; `conversation_id` is only
    /// echoed back (a fresh UUID is generated when absent or blank).
    ///
    /// # Errors
    /// - `InvalidQuestion` for a blank question
    /// - `FaqNotFound` / `InvalidCategory` when every selected call failed
    ///   and at least one failed for missing FAQ content
    /// - `Service` / `EmptyAnswer` when a model call fails
    #[instrument(skip_all, fields(model = %self.model.model_name()))]
    pub async fn answer(&self, question: &str, conversation_id: Option<String>) -> Result<ChatResult> {
        let started = Instant::now();

        let question = question.trim();
        if question.is_empty() {
            return Err(AgentError::InvalidQuestion("question must not be empty".into()));
        }

        let conversation_id = conversation_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let step = Instant::now();
        let calls = self.select(question).await?;
        debug!(elapsed_ms = step.elapsed().as_millis() as u64, "selection finished");

        if calls.is_empty() {
            info!(question = %preview(question), "question outside scope");
            return Ok(ChatResult {
                answer: OUT_OF_SCOPE_ANSWER.to_string(),
                category: OUT_OF_SCOPE_CATEGORY.to_string(),
                conversation_id,
                processing_time: seconds_since(started),
            });
        }

        let step = Instant::now();
        let invocations = execute_all(&calls, &self.knowledge, &self.organisms);
        debug!(elapsed_ms = step.elapsed().as_millis() as u64, "execution finished");

        if let Some(err) = all_failed_not_found(&invocations) {
            return Err(err);
        }

        let step = Instant::now();
        let answer = self.synthesize(question, &invocations).await?;
        debug!(elapsed_ms = step.elapsed().as_millis() as u64, "synthesis finished");

        let category = derive_category(&invocations);
        let processing_time = seconds_since(started);
        info!(%category, calls = invocations.len(), processing_time, "question answered");

        Ok(ChatResult {
            answer,
            category,
            conversation_id,
            processing_time,
        })
    }

    async fn select(&self, question: &str) -> Result<Vec<ToolCall>> {
        let tools = self.catalog.build(&self.knowledge);
        let messages = [
            ChatMessage::system(SELECTION_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];

        info!(tools = tools.len(), "requesting function selection");
        let completion = self.model.complete(&messages, &tools).await?;
        info!(selected = completion.tool_calls.len(), "model selected functions");
        Ok(completion.tool_calls)
    }

    async fn synthesize(&self, question: &str, invocations: &[Invocation]) -> Result<String> {
        let mut messages = Vec::with_capacity(2 + invocations.len() * 2);
        messages.push(ChatMessage::system(SYNTHESIS_SYSTEM_PROMPT));
        messages.push(ChatMessage::user(question));
        for inv in invocations {
            messages.push(ChatMessage::assistant_tool_calls(vec![inv.call.clone()]));
            messages.push(ChatMessage::tool_result(inv.call.id.clone(), inv.payload()));
        }

        let completion = self.model.complete(&messages, &[]).await?;
        completion
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(AgentError::EmptyAnswer)
    }
}

/// First successful call decides: FAQ yields its category, a database call
/// yields `database_stats`. No success yields `out_of_scope`.
pub fn derive_category(invocations: &[Invocation]) -> String {
    for inv in invocations {
        match &inv.outcome {
            Ok(FunctionOutput::Faq { category, .. }) => return category.clone(),
            Ok(FunctionOutput::Statistics { .. } | FunctionOutput::Search { .. }) => {
                return DATABASE_STATS_CATEGORY.to_string();
            }
            Err(_) => continue,
        }
    }
    OUT_OF_SCOPE_CATEGORY.to_string()
}

fn all_failed_not_found(invocations: &[Invocation]) -> Option<AgentError> {
    if invocations.iter().any(|i| i.outcome.is_ok()) {
        return None;
    }
    invocations
        .iter()
        .filter_map(|i| i.outcome.as_ref().err())
        .find_map(|e| e.as_not_found())
}

fn seconds_since(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0
}

fn preview(s: &str) -> String {
    s.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InvocationError;

    fn ok_faq(id: &str, category: &str) -> Invocation {
        Invocation {
            call: ToolCall::function(id, "get_faq_answer", "{}"),
            outcome: Ok(FunctionOutput::Faq {
                category: category.into(),
                content: "x".into(),
            }),
        }
    }

    fn ok_stats(id: &str) -> Invocation {
        let table = OrganismTable::default();
        Invocation {
            call: ToolCall::function(id, "get_organism_statistics", "{}"),
            outcome: Ok(FunctionOutput::Statistics {
                statistics: table.statistics(&Default::default()),
            }),
        }
    }

    fn failed(id: &str, err: InvocationError) -> Invocation {
        Invocation {
            call: ToolCall::function(id, "get_faq_answer", "{}"),
            outcome: Err(err),
        }
    }

    #[test]
    fn category_follows_first_successful_call() {
        assert_eq!(derive_category(&[ok_faq("a", "sales"), ok_stats("b")]), "sales");
        assert_eq!(
            derive_category(&[ok_stats("a"), ok_faq("b", "sales")]),
            DATABASE_STATS_CATEGORY
        );
    }

    #[test]
    fn failed_calls_are_skipped_when_deriving() {
        let inv = [
            failed("a", InvocationError::UnknownFunction("x".into())),
            ok_faq("b", "labs"),
        ];
        assert_eq!(derive_category(&inv), "labs");
        assert_eq!(derive_category(&[]), OUT_OF_SCOPE_CATEGORY);
    }

    #[test]
    fn not_found_surfaces_only_when_nothing_succeeded() {
        let inv = [
            failed("a", InvocationError::UnknownFunction("x".into())),
            failed("b", InvocationError::FaqNotFound("reports".into())),
        ];
        assert!(matches!(
            all_failed_not_found(&inv),
            Some(AgentError::FaqNotFound(c)) if c == "reports"
        ));

        let mixed = [
            failed("a", InvocationError::FaqNotFound("reports".into())),
            ok_stats("b"),
        ];
        assert!(all_failed_not_found(&mixed).is_none());
    }

    #[test]
    fn processing_time_is_rounded_to_millis() {
        let t = seconds_since(Instant::now());
        assert!(t >= 0.0);
        let millis = t * 1000.0;
        assert!((millis - millis.round()).abs() < 1e-9);
    }
}
