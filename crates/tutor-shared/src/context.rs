//! Analysis context - what the router inferred from one student message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of educational request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "explain", "how does", "step by step"
    Explanation,
    /// "notes", "summary", "summarize"
    Notes,
    /// "practice", "problems", "exercises", "quiz"
    RequestPracticeProblems,
    /// No cue matched
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::Explanation,
        Intent::Notes,
        Intent::RequestPracticeProblems,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Explanation => "explanation",
            Intent::Notes => "notes",
            Intent::RequestPracticeProblems => "request_practice_problems",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse a label produced by an external classifier.
    /// Returns None for anything outside the known vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "explanation" => Some(Intent::Explanation),
            "notes" => Some(Intent::Notes),
            "request_practice_problems" => Some(Intent::RequestPracticeProblems),
            "unknown" => Some(Intent::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse affect label driving difficulty and quantity adaptation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    Frustrated,
    Confident,
    Anxious,
    Neutral,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 4] = [
        EmotionalState::Frustrated,
        EmotionalState::Confident,
        EmotionalState::Anxious,
        EmotionalState::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::Frustrated => "frustrated",
            EmotionalState::Confident => "confident",
            EmotionalState::Anxious => "anxious",
            EmotionalState::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "frustrated" => Some(EmotionalState::Frustrated),
            "confident" => Some(EmotionalState::Confident),
            "anxious" => Some(EmotionalState::Anxious),
            "neutral" => Some(EmotionalState::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which strategy produced a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Ai,
    RuleFallback,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSource::Ai => "ai",
            ContextSource::RuleFallback => "rule_fallback",
        }
    }
}

impl fmt::Display for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of analysing one message. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub intent: Intent,
    /// Lowercase, spelling-corrected, words joined by `_`
    pub topic: String,
    pub emotional_state: EmotionalState,
    /// Calibrated confidence in [0, 1]
    pub confidence: f32,
    pub source: ContextSource,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn new(
        intent: Intent,
        topic: impl Into<String>,
        emotional_state: EmotionalState,
        confidence: f32,
        source: ContextSource,
    ) -> Self {
        Self {
            intent,
            topic: topic.into(),
            emotional_state,
            confidence: clamp_confidence(confidence),
            source,
            analyzed_at: Utc::now(),
        }
    }
}

/// Clamp to [0, 1]; NaN collapses to 0
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
