//! Student profile as seen by the router.
//!
//! The profile is owned by an external profile store; the router only
//! reads the mastery summary to seed the starting difficulty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary used when the caller sends no profile
pub const DEFAULT_MASTERY_SUMMARY: &str = "Level 5: Developing";

/// Coarse mastery bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Beginner => "beginner",
            MasteryLevel::Intermediate => "intermediate",
            MasteryLevel::Advanced => "advanced",
        }
    }

    /// Parse a free-text mastery summary.
    ///
    /// Accepts the bucket names in any case, or "Level N" descriptions
    /// (1-3 beginner, 4-6 intermediate, 7+ advanced).
    pub fn from_summary(summary: &str) -> Option<Self> {
        let s = summary.trim().to_lowercase();

        if let Some(level) = parse_level_number(&s) {
            return Some(match level {
                0..=3 => MasteryLevel::Beginner,
                4..=6 => MasteryLevel::Intermediate,
                _ => MasteryLevel::Advanced,
            });
        }

        if s.contains("beginner") || s.contains("novice") {
            Some(MasteryLevel::Beginner)
        } else if s.contains("intermediate") {
            Some(MasteryLevel::Intermediate)
        } else if s.contains("advanced") || s.contains("expert") {
            Some(MasteryLevel::Advanced)
        } else {
            None
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// "level 5: developing" -> 5
fn parse_level_number(s: &str) -> Option<u32> {
    let rest = s.strip_prefix("level")?.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Read-only view of a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub mastery_level_summary: String,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>, mastery_level_summary: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            mastery_level_summary: mastery_level_summary.into(),
        }
    }

    /// Profile assumed for students the profile store knows nothing about
    pub fn default_for(user_id: &str) -> Self {
        Self::new(user_id, DEFAULT_MASTERY_SUMMARY)
    }

    pub fn mastery(&self) -> Option<MasteryLevel> {
        MasteryLevel::from_summary(&self.mastery_level_summary)
    }
}
