//! Context analyzer: AI extraction first, rule extractor on any failure.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tutor_shared::context::clamp_confidence;
use tutor_shared::{AnalysisContext, ContextSource, EmotionalState, Intent};

use crate::config::Config;
use crate::rules::{NormalizedText, RuleExtractor};
use crate::translator::{ContextExtractor, ExtractionUnavailable, RawExtraction};

/// Leading request phrases removed from AI topics, matched word by word
const LEADING_REQUEST_WORDS: &[&[&str]] = &[
    &["explain"],
    &["describe"],
    &["tell"],
    &["show"],
    &["give"],
    &["please"],
    &["can", "you"],
    &["could", "you"],
    &["would", "you"],
    &["i", "want"],
    &["i", "need"],
    &["help", "with"],
    &["me"],
];

/// Produces exactly one [`AnalysisContext`] per message
pub struct ContextAnalyzer {
    extractor: Option<Arc<dyn ContextExtractor>>,
    rules: RuleExtractor,
    timeout: Duration,
    ai_confidence: f32,
}

impl ContextAnalyzer {
    pub fn new(
        extractor: Option<Arc<dyn ContextExtractor>>,
        rules: RuleExtractor,
        timeout: Duration,
        ai_confidence: f32,
    ) -> Self {
        Self {
            extractor,
            rules,
            timeout,
            ai_confidence: clamp_confidence(ai_confidence),
        }
    }

    /// Rules only, no AI path
    pub fn rules_only(rules: RuleExtractor) -> Self {
        Self::new(None, rules, Duration::ZERO, 0.0)
    }

    pub fn from_config(config: &Config, extractor: Option<Arc<dyn ContextExtractor>>) -> Self {
        let rules = RuleExtractor::new(
            config.rules.keyword_confidence,
            config.rules.default_confidence,
        );
        let extractor = if config.llm.enabled { extractor } else { None };
        Self::new(extractor, rules, config.llm.timeout(), config.llm.ai_confidence)
    }

    pub fn has_ai(&self) -> bool {
        self.extractor.is_some()
    }

    /// Analyze one message. Never fails: every AI problem degrades to rules.
    pub async fn analyze(&self, text: &str) -> AnalysisContext {
        match self.try_ai(text).await {
            Ok(context) => {
                debug!("AI context: {} / {}", context.intent, context.topic);
                context
            }
            Err(ExtractionUnavailable::Disabled) => self.rules.extract(text).into_context(),
            Err(reason) => {
                let source = self.extractor.as_ref().map_or("none", |e| e.name());
                warn!(
                    "AI extraction via {} unavailable ({}), using rule fallback",
                    source, reason
                );
                self.rules.extract(text).into_context()
            }
        }
    }

    async fn try_ai(&self, text: &str) -> Result<AnalysisContext, ExtractionUnavailable> {
        let extractor = self.extractor.as_ref().ok_or(ExtractionUnavailable::Disabled)?;

        let raw = tokio::time::timeout(self.timeout, extractor.extract(text, self.timeout))
            .await
            .map_err(|_| ExtractionUnavailable::Timeout)??;

        self.validate(raw)
    }

    fn validate(&self, raw: RawExtraction) -> Result<AnalysisContext, ExtractionUnavailable> {
        let intent = Intent::parse(&raw.intent).ok_or_else(|| {
            ExtractionUnavailable::Malformed(format!("unknown intent '{}'", raw.intent))
        })?;
        let emotional_state = EmotionalState::parse(&raw.emotional_state).ok_or_else(|| {
            ExtractionUnavailable::Malformed(format!(
                "unknown emotional_state '{}'",
                raw.emotional_state
            ))
        })?;
        let topic = normalize_ai_topic(&raw.topic)
            .ok_or_else(|| ExtractionUnavailable::Malformed("empty topic".to_string()))?;

        let confidence = raw
            .confidence
            .map(clamp_confidence)
            .unwrap_or(self.ai_confidence);

        Ok(AnalysisContext::new(
            intent,
            topic,
            emotional_state,
            confidence,
            ContextSource::Ai,
        ))
    }
}

/// Lowercase, spell-correct, strip leading request words, join with `_`.
/// None when nothing is left.
pub fn normalize_ai_topic(topic: &str) -> Option<String> {
    let text = NormalizedText::new(topic);
    let mut words: &[String] = &text.words;

    'strip: loop {
        for phrase in LEADING_REQUEST_WORDS {
            if words.len() >= phrase.len()
                && words.iter().zip(phrase.iter()).all(|(w, p)| w == p)
            {
                words = &words[phrase.len()..];
                continue 'strip;
            }
        }
        break;
    }

    if words.is_empty() {
        None
    } else {
        Some(words.join("_"))
    }
}
