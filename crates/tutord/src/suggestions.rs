//! Follow-up suggestions shown with each orchestration result.

use tutor_shared::{EmotionalState, Intent};

pub const MAX_SUGGESTIONS: usize = 3;

pub const NEXT_ACTIONS: [&str; 3] = ["Review flashcards", "Request notes", "Get explanation"];

/// Up to three follow-ups keyed by intent, then emotional state
pub fn generate_suggestions(intent: Intent, emotional_state: EmotionalState) -> Vec<String> {
    let base: &[&str] = match intent {
        Intent::RequestPracticeProblems => &[
            "Generate flashcards for practice",
            "Provide concise notes summary",
            "Ask for detailed concept explanation",
        ],
        Intent::Explanation => &[
            "Provide practice questions",
            "Create summarized notes",
            "Test understanding via flashcards",
        ],
        Intent::Notes => &[
            "Create flashcards from notes",
            "Generate practice questions",
            "Get concept explanations",
        ],
        Intent::Unknown => &[],
    };

    let extra = match emotional_state {
        EmotionalState::Frustrated | EmotionalState::Anxious => {
            Some("Break content into simpler parts")
        }
        EmotionalState::Confident => Some("Try challenging problems"),
        EmotionalState::Neutral => None,
    };

    base.iter()
        .copied()
        .chain(extra)
        .take(MAX_SUGGESTIONS)
        .map(String::from)
        .collect()
}

pub fn next_actions() -> Vec<String> {
    NEXT_ACTIONS.iter().map(|s| s.to_string()).collect()
}
