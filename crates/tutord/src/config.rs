//! Configuration management for tutord.
//!
//! Loads settings from $TUTOR_CONFIG, /etc/tutor/config.toml or
//! /var/lib/tutor/config.toml, otherwise uses defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tutor_shared::{ToolName, DEFAULT_HISTORY_CAP};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "TUTOR_CONFIG";

/// Config file path
pub const CONFIG_PATH: &str = "/etc/tutor/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/tutor/config.toml";

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Global request timeout in seconds (entire pipeline)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:7870".to_string()
}

fn default_request_timeout() -> u64 {
    20
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// AI extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Master switch for the AI path; rules only when false
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,

    /// OpenAI-compatible API base
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Single-attempt budget for the AI call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Confidence reported for AI results that carry none
    #[serde(default = "default_ai_confidence")]
    pub ai_confidence: f32,
}

fn default_llm_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}

fn default_model() -> String {
    "deepseek-ai/DeepSeek-R1".to_string()
}

fn default_api_key_env() -> String {
    "HF_TOKEN".to_string()
}

fn default_timeout_ms() -> u64 {
    4_000 // bias toward the rule fallback over a slow model
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    150
}

fn default_ai_confidence() -> f32 {
    0.9
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            ai_confidence: default_ai_confidence(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Calibrated confidences for the rule fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Reported when an intent cue matched
    #[serde(default = "default_keyword_confidence")]
    pub keyword_confidence: f32,

    /// Reported on the default path (no intent cue)
    #[serde(default = "default_default_confidence")]
    pub default_confidence: f32,
}

fn default_keyword_confidence() -> f32 {
    0.6
}

fn default_default_confidence() -> f32 {
    0.3
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            keyword_confidence: default_keyword_confidence(),
            default_confidence: default_default_confidence(),
        }
    }
}

/// Tool routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Tool that serves practice requests: quiz_generator or flashcard_generator
    #[serde(default = "default_practice_tool")]
    pub practice_tool: String,
}

fn default_practice_tool() -> String {
    ToolName::QuizGenerator.as_str().to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            practice_tool: default_practice_tool(),
        }
    }
}

impl RoutingConfig {
    /// Resolve the practice tool, falling back to quiz_generator on typos
    pub fn practice_tool(&self) -> ToolName {
        match ToolName::parse(&self.practice_tool) {
            Some(tool @ (ToolName::QuizGenerator | ToolName::FlashcardGenerator)) => tool,
            _ => {
                warn!(
                    "Unsupported practice_tool '{}', using quiz_generator",
                    self.practice_tool
                );
                ToolName::QuizGenerator
            }
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Contexts kept per session
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Sessions kept in memory before least-recently-active eviction
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub sessions: SessionConfig,
}

impl Config {
    /// Load config from file, or return defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match Self::load_from_path(&path) {
                Ok(config) => return config,
                Err(e) => warn!("{} points at unusable config: {:#}", CONFIG_ENV, e),
            }
        }

        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
