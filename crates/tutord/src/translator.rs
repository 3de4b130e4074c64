//! AI context extraction.
//!
//! Asks an OpenAI-compatible chat model for `{intent, topic, emotional_state}`.
//! Every failure collapses into [`ExtractionUnavailable`]; the analyzer
//! recovers from all of them with the rule extractor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

const SYSTEM_PROMPT: &str = "You are an educational AI assistant. \
Extract and return a JSON object with keys: intent, topic, emotional_state. \
intent is one of: explanation, notes, request_practice_problems, unknown. \
emotional_state is one of: frustrated, confident, anxious, neutral. \
Ensure 'topic' is the main subject (multi-word topics using underscores). \
Respond ONLY with valid JSON.";

/// Why the AI path produced nothing usable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionUnavailable {
    #[error("AI extraction disabled")]
    Disabled,

    #[error("AI extraction timed out")]
    Timeout,

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Labels exactly as the model returned them, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    pub intent: String,
    pub topic: String,
    pub emotional_state: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RawExtraction {
    pub fn new(intent: &str, topic: &str, emotional_state: &str) -> Self {
        Self {
            intent: intent.to_string(),
            topic: topic.to_string(),
            emotional_state: emotional_state.to_string(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Source of AI-derived context. Injected into the analyzer.
#[async_trait]
pub trait ContextExtractor: Send + Sync {
    /// One attempt, bounded by `timeout`
    async fn extract(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<RawExtraction, ExtractionUnavailable>;

    /// Short label for logs
    fn name(&self) -> &str;
}

// ============================================================================
// HTTP extractor (production)
// ============================================================================

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Extractor backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct HttpContextExtractor {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl HttpContextExtractor {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            temperature: 0.7,
            max_tokens: 150,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let mut extractor = Self::new(&config.base_url, &config.model, config.api_key());
        extractor.temperature = config.temperature;
        extractor.max_tokens = config.max_tokens;
        extractor
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ContextExtractor for HttpContextExtractor {
    async fn extract(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<RawExtraction, ExtractionUnavailable> {
        let api_key = self.api_key.as_deref().ok_or(ExtractionUnavailable::Disabled)?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("AI extraction via {} ({} chars)", url, text.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(ExtractionUnavailable::Upstream(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(map_reqwest_error)?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ExtractionUnavailable::Malformed("empty completion".to_string()))?;

        parse_extraction(&content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ExtractionUnavailable {
    if e.is_timeout() {
        ExtractionUnavailable::Timeout
    } else if e.is_decode() {
        ExtractionUnavailable::Malformed(e.to_string())
    } else {
        ExtractionUnavailable::Upstream(e.to_string())
    }
}

/// Parse a model reply into raw labels
pub fn parse_extraction(reply: &str) -> Result<RawExtraction, ExtractionUnavailable> {
    let json = extract_json(strip_reasoning(reply)).map_err(ExtractionUnavailable::Malformed)?;
    serde_json::from_str(&json).map_err(|e| ExtractionUnavailable::Malformed(e.to_string()))
}

/// Reasoning models prefix the answer with a <think> block
fn strip_reasoning(reply: &str) -> &str {
    match reply.rfind("</think>") {
        Some(end) => &reply[end + "</think>".len()..],
        None => reply,
    }
}

/// Extract a JSON object from a reply: bare, fenced, or embedded in prose
pub fn extract_json(reply: &str) -> Result<String, String> {
    let t = reply.trim();
    if t.starts_with('{') && t.ends_with('}') {
        return Ok(t.to_string());
    }

    if let Some(start) = t.find("```json") {
        let body = &t[start + 7..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if !inner.is_empty() {
                return Ok(inner.to_string());
            }
        }
    }

    if let Some(start) = t.find("```") {
        let body = &t[start + 3..];
        if let Some(end) = body.find("```") {
            let inner = body[..end]
                .lines()
                .skip_while(|l| !l.trim_start().starts_with('{'))
                .collect::<Vec<_>>()
                .join("\n");
            if !inner.is_empty() {
                return Ok(inner);
            }
        }
    }

    if let (Some(s), Some(e)) = (t.find('{'), t.rfind('}')) {
        if s < e {
            return Ok(t[s..=e].to_string());
        }
    }

    Err("no JSON object in reply".to_string())
}

// ============================================================================
// Fake extractor (tests)
// ============================================================================

/// Scripted extractor for deterministic tests
pub struct FakeContextExtractor {
    reply: Result<RawExtraction, ExtractionUnavailable>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeContextExtractor {
    pub fn replying(raw: RawExtraction) -> Self {
        Self {
            reply: Ok(raw),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ExtractionUnavailable) -> Self {
        Self {
            reply: Err(err),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to exercise the caller's timeout
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContextExtractor for FakeContextExtractor {
    async fn extract(
        &self,
        _text: &str,
        _timeout: Duration,
    ) -> Result<RawExtraction, ExtractionUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "fake"
    }
}
