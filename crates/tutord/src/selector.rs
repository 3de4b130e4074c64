//! Tool selection - maps (intent, emotional state) to a tool and variant.

use tutor_shared::{EmotionalState, Intent, ToolName, ToolSelection, Variant};

/// Deterministic tool router
#[derive(Debug, Clone, Copy)]
pub struct ToolSelector {
    practice_tool: ToolName,
}

impl Default for ToolSelector {
    fn default() -> Self {
        Self::new(ToolName::QuizGenerator)
    }
}

impl ToolSelector {
    /// `practice_tool` serves request_practice_problems
    pub fn new(practice_tool: ToolName) -> Self {
        Self { practice_tool }
    }

    pub fn select(&self, intent: Intent, emotional_state: EmotionalState) -> ToolSelection {
        let tool_name = match intent {
            Intent::Explanation => ToolName::ConceptExplainer,
            Intent::Notes => ToolName::NoteMaker,
            Intent::RequestPracticeProblems => self.practice_tool,
            Intent::Unknown => ToolName::FALLBACK,
        };

        ToolSelection {
            tool_name,
            variant: variant_for(emotional_state),
        }
    }
}

pub fn variant_for(emotional_state: EmotionalState) -> Variant {
    match emotional_state {
        EmotionalState::Frustrated => Variant::Supportive,
        EmotionalState::Confident => Variant::Challenging,
        EmotionalState::Anxious | EmotionalState::Neutral => Variant::Standard,
    }
}
