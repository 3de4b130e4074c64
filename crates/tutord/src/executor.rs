//! Tool execution.
//!
//! Content generation is owned by the downstream tools; the daemon ships a
//! summary executor that reports what would be generated.

use async_trait::async_trait;
use tutor_shared::rpc::ToolExecution;
use tutor_shared::{ToolName, ToolSelection, TutorError};

use crate::params::ValidatedParameters;

/// Everything a tool needs for one call
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub selection: ToolSelection,
    pub params: ValidatedParameters,
}

#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolExecution, TutorError>;
}

/// Executor that summarizes the request instead of generating content
#[derive(Debug, Default)]
pub struct SummaryExecutor;

#[async_trait]
impl ToolExecutor for SummaryExecutor {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolExecution, TutorError> {
        let params = &invocation.params;
        Ok(ToolExecution {
            tool_name: invocation.selection.tool_name,
            request_params: params.as_map().clone(),
            formatted_response: summarize(params),
        })
    }
}

/// One-line description of a tool call
pub fn summarize(params: &ValidatedParameters) -> String {
    let topic = params.text("topic").unwrap_or("general");
    let difficulty = params.text("difficulty").unwrap_or("medium");
    let count = params.item_count().unwrap_or(0);

    match params.tool() {
        ToolName::QuizGenerator => {
            format!("Generated {} {} practice problems on {}", count, difficulty, topic)
        }
        ToolName::FlashcardGenerator => {
            format!("Created {} {} flashcards on {}", count, difficulty, topic)
        }
        ToolName::NoteMaker => {
            let style = params.text("note_taking_style").unwrap_or("structured");
            format!("Generated {} notes on {}", style, topic)
        }
        ToolName::ConceptExplainer => {
            let depth = params.text("desired_depth").unwrap_or("intermediate");
            let concept = params.text("concept_to_explain").unwrap_or(topic);
            format!("Generated {} explanation of {}", depth, concept.replace('_', " "))
        }
    }
}
