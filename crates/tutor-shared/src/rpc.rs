//! Request/response types for the tutord HTTP API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::{ContextSource, EmotionalState, Intent};
use crate::params::ParamValue;
use crate::tools::{ToolName, Variant};

/// Optional profile hint carried by a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileHint {
    pub mastery_level_summary: String,
}

/// Inbound orchestration request.
///
/// `user_input` and `user_id` default to empty so a missing field reaches
/// request validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrateRequest {
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<ProfileHint>,
}

impl OrchestrateRequest {
    pub fn new(user_input: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            user_id: user_id.into(),
            session_id: None,
            user_profile: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_mastery(mut self, summary: impl Into<String>) -> Self {
        self.user_profile = Some(ProfileHint {
            mastery_level_summary: summary.into(),
        });
        self
    }
}

/// What the core decided for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub intent: Intent,
    pub topic: String,
    pub emotional_state: EmotionalState,
    pub tool_name: ToolName,
    pub variant: Variant,
    pub parameters: BTreeMap<String, ParamValue>,
    pub session_id: String,
    pub confidence_source: ContextSource,
    pub confidence: f32,
}

/// Record of the tool call made on behalf of the student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecution {
    pub tool_name: ToolName,
    pub request_params: BTreeMap<String, ParamValue>,
    pub formatted_response: String,
}

/// Full response of `POST /api/orchestrate_full`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullOrchestratorResponse {
    pub success: bool,
    pub response: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub suggestions: Vec<String>,
    pub tool_execution: ToolExecution,
    pub next_actions: Vec<String>,
}

/// Error body for rejected requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: i32,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: i32) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_sha: String,
    /// Model name when the AI path is configured, None when rules only
    pub model: Option<String>,
    pub active_sessions: usize,
    pub uptime_seconds: u64,
}
