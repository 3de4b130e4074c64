//! Tool registry names and selection result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Educational content generators the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    QuizGenerator,
    FlashcardGenerator,
    NoteMaker,
    ConceptExplainer,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::QuizGenerator,
        ToolName::FlashcardGenerator,
        ToolName::NoteMaker,
        ToolName::ConceptExplainer,
    ];

    /// Tool used when the intent maps to nothing specific
    pub const FALLBACK: ToolName = ToolName::FlashcardGenerator;

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::QuizGenerator => "quiz_generator",
            ToolName::FlashcardGenerator => "flashcard_generator",
            ToolName::NoteMaker => "note_maker",
            ToolName::ConceptExplainer => "concept_explainer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "quiz_generator" => Some(ToolName::QuizGenerator),
            "flashcard_generator" => Some(ToolName::FlashcardGenerator),
            "note_maker" => Some(ToolName::NoteMaker),
            "concept_explainer" => Some(ToolName::ConceptExplainer),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Selection modifier derived from emotional state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Supportive,
    Challenging,
    Standard,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Supportive => "supportive",
            Variant::Challenging => "challenging",
            Variant::Standard => "standard",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tool to run and in which flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSelection {
    pub tool_name: ToolName,
    pub variant: Variant,
}
