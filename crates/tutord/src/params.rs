//! Parameter extraction and emotional adaptation.
//!
//! Three phases, all deterministic:
//! 1. base: schema defaults filled from the analysis context and profile
//! 2. adapt: difficulty, item count and support flags keyed by emotional state
//! 3. validate: every declared parameter checked against its schema
//!
//! Adaptation only touches parameters the tool declares. Validation never
//! fails; it corrects and records what it corrected.

use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use tutor_shared::{
    AnalysisContext, EmotionalState, MasteryLevel, ParamValue, ToolName, ToolSelection,
    UserProfile,
};

use crate::schema::{schema_for, ParamKind, ParamSpec, ToolSchema, DEFAULT_ITEMS, MAX_ITEMS};

/// Item cap for frustrated students
pub const FRUSTRATED_MAX_ITEMS: i64 = 3;

/// Extra items for confident students
pub const CONFIDENT_EXTRA_ITEMS: i64 = 2;

pub type ParamMap = BTreeMap<String, ParamValue>;

/// What validation had to fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// Integer outside its range, clamped
    Clamped,
    /// Wrong type or illegal enum value, reset to default
    Reset,
    /// Missing, filled from default
    Filled,
    /// Not declared by the tool, removed
    Dropped,
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrectionKind::Clamped => "clamped",
            CorrectionKind::Reset => "reset to default",
            CorrectionKind::Filled => "filled from default",
            CorrectionKind::Dropped => "dropped",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamCorrection {
    pub param: String,
    pub kind: CorrectionKind,
}

/// Parameters guaranteed to satisfy the tool's schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    tool: ToolName,
    params: ParamMap,
    corrections: Vec<ParamCorrection>,
}

impl ValidatedParameters {
    pub fn tool(&self) -> ToolName {
        self.tool
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Value of the tool's item count parameter, if it has one
    pub fn item_count(&self) -> Option<i64> {
        schema_for(self.tool)
            .count_param
            .and_then(|name| self.get(name))
            .and_then(ParamValue::as_int)
    }

    pub fn corrections(&self) -> &[ParamCorrection] {
        &self.corrections
    }

    pub fn as_map(&self) -> &ParamMap {
        &self.params
    }
}

/// Builds validated tool parameters for one analysis
pub struct ParameterBuilder;

impl ParameterBuilder {
    pub fn build(
        context: &AnalysisContext,
        selection: ToolSelection,
        profile: &UserProfile,
    ) -> ValidatedParameters {
        let schema = schema_for(selection.tool_name);
        let mut params = base_parameters(schema, context, profile);
        adapt(schema, &mut params, context.emotional_state);
        validate(schema, params)
    }
}

fn difficulty_for(mastery: MasteryLevel) -> &'static str {
    match mastery {
        MasteryLevel::Beginner => "easy",
        MasteryLevel::Intermediate => "medium",
        MasteryLevel::Advanced => "hard",
    }
}

fn depth_for(difficulty: &str) -> &'static str {
    match difficulty {
        "easy" => "basic",
        "hard" => "advanced",
        _ => "intermediate",
    }
}

/// Phase 1: defaults plus values derived from context and profile
pub fn base_parameters(
    schema: &ToolSchema,
    context: &AnalysisContext,
    profile: &UserProfile,
) -> ParamMap {
    let mastery = profile.mastery();

    schema
        .params
        .iter()
        .map(|spec| {
            let value = match spec.name {
                "topic" | "subject" | "concept_to_explain" => ParamValue::text(&context.topic),
                "current_topic" => {
                    let head = context.topic.split('_').next().unwrap_or(&context.topic);
                    ParamValue::text(head)
                }
                "difficulty" => match mastery {
                    Some(level) => ParamValue::text(difficulty_for(level)),
                    None => spec.default_value(),
                },
                _ => spec.default_value(),
            };
            (spec.name.to_string(), value)
        })
        .collect()
}

/// Phase 2: emotional adaptation. Only declared parameters are written.
pub fn adapt(schema: &ToolSchema, params: &mut ParamMap, emotional_state: EmotionalState) {
    let count = schema.count_param.map(|name| {
        let current = params.get(name).and_then(ParamValue::as_int);
        (name, current.unwrap_or(DEFAULT_ITEMS))
    });

    let mut set = |name: &str, value: ParamValue| {
        if schema.declares(name) {
            params.insert(name.to_string(), value);
        }
    };

    match emotional_state {
        EmotionalState::Frustrated => {
            set("difficulty", ParamValue::text("easy"));
            if let Some((name, n)) = count {
                set(name, ParamValue::Int(n.min(FRUSTRATED_MAX_ITEMS)));
            }
            set("include_encouragement", ParamValue::Bool(true));
            set("include_analogies", ParamValue::Bool(true));
        }
        EmotionalState::Confident => {
            set("difficulty", ParamValue::text("hard"));
            if let Some((name, n)) = count {
                set(name, ParamValue::Int((n + CONFIDENT_EXTRA_ITEMS).min(MAX_ITEMS)));
            }
            set("include_advanced_concepts", ParamValue::Bool(true));
        }
        EmotionalState::Anxious => {
            set("difficulty", ParamValue::text("easy"));
            set("include_encouragement", ParamValue::Bool(true));
        }
        EmotionalState::Neutral => {}
    }

    // Depth follows difficulty
    if schema.declares("difficulty") && schema.declares("desired_depth") {
        if let Some(depth) = params
            .get("difficulty")
            .and_then(ParamValue::as_text)
            .map(depth_for)
        {
            params.insert("desired_depth".to_string(), ParamValue::text(depth));
        }
    }
}

/// Phase 3: enforce the schema
pub fn validate(schema: &ToolSchema, mut raw: ParamMap) -> ValidatedParameters {
    let mut params = ParamMap::new();
    let mut corrections = Vec::new();

    for spec in schema.params {
        let (value, correction) = match raw.remove(spec.name) {
            Some(value) => check(spec, value),
            None => (spec.default_value(), Some(CorrectionKind::Filled)),
        };
        if let Some(kind) = correction {
            warn!(
                "ParameterOutOfBounds: {}.{} {} (now {})",
                schema.tool, spec.name, kind, value
            );
            corrections.push(ParamCorrection {
                param: spec.name.to_string(),
                kind,
            });
        }
        params.insert(spec.name.to_string(), value);
    }

    for name in raw.into_keys() {
        warn!("ParameterOutOfBounds: {}.{} not declared, dropped", schema.tool, name);
        corrections.push(ParamCorrection {
            param: name,
            kind: CorrectionKind::Dropped,
        });
    }

    ValidatedParameters {
        tool: schema.tool,
        params,
        corrections,
    }
}

fn check(spec: &ParamSpec, value: ParamValue) -> (ParamValue, Option<CorrectionKind>) {
    let reset = || (spec.default_value(), Some(CorrectionKind::Reset));

    match (spec.kind, value) {
        (ParamKind::Text, v @ ParamValue::Text(_)) => (v, None),
        (ParamKind::Bool, v @ ParamValue::Bool(_)) => (v, None),
        (ParamKind::Int { min, max }, ParamValue::Int(n)) => {
            let clamped = n.clamp(min, max);
            let correction = (clamped != n).then_some(CorrectionKind::Clamped);
            (ParamValue::Int(clamped), correction)
        }
        (ParamKind::Enum(legal), ParamValue::Text(s)) if legal.contains(&s.as_str()) => {
            (ParamValue::Text(s), None)
        }
        _ => reset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CONCEPT_EXPLAINER, FLASHCARD_GENERATOR, NOTE_MAKER, QUIZ_GENERATOR};
    use tutor_shared::{ContextSource, Intent, Variant};

    fn context(topic: &str, emotion: EmotionalState) -> AnalysisContext {
        AnalysisContext::new(
            Intent::RequestPracticeProblems,
            topic,
            emotion,
            0.6,
            ContextSource::RuleFallback,
        )
    }

    fn selection(tool: ToolName) -> ToolSelection {
        ToolSelection {
            tool_name: tool,
            variant: Variant::Standard,
        }
    }

    fn profile(summary: &str) -> UserProfile {
        UserProfile::new("u1", summary)
    }

    #[test]
    fn test_neutral_quiz_defaults() {
        let params = ParameterBuilder::build(
            &context("algebra", EmotionalState::Neutral),
            selection(ToolName::QuizGenerator),
            &profile("Level 5: Developing"),
        );

        assert_eq!(params.text("topic"), Some("algebra"));
        assert_eq!(params.text("subject"), Some("algebra"));
        assert_eq!(params.text("difficulty"), Some("medium"));
        assert_eq!(params.text("question_type"), Some("practice"));
        assert_eq!(params.item_count(), Some(5));
        assert_eq!(params.flag("include_encouragement"), Some(false));
        assert!(params.corrections().is_empty());
    }

    #[test]
    fn test_mastery_seeds_difficulty() {
        let ctx = context("algebra", EmotionalState::Neutral);
        let sel = selection(ToolName::FlashcardGenerator);

        let easy = ParameterBuilder::build(&ctx, sel, &profile("beginner"));
        let hard = ParameterBuilder::build(&ctx, sel, &profile("Level 8: Proficient"));
        let unknown = ParameterBuilder::build(&ctx, sel, &profile("???"));

        assert_eq!(easy.text("difficulty"), Some("easy"));
        assert_eq!(hard.text("difficulty"), Some("hard"));
        assert_eq!(unknown.text("difficulty"), Some("medium"));
    }

    #[test]
    fn test_frustrated_quiz() {
        let params = ParameterBuilder::build(
            &context("calculus_derivatives", EmotionalState::Frustrated),
            selection(ToolName::QuizGenerator),
            &profile("advanced"),
        );

        assert_eq!(params.text("difficulty"), Some("easy"));
        assert_eq!(params.item_count(), Some(3));
        assert_eq!(params.flag("include_encouragement"), Some(true));
        // quiz_generator does not declare include_analogies
        assert!(params.get("include_analogies").is_none());
    }

    #[test]
    fn test_confident_flashcards() {
        let params = ParameterBuilder::build(
            &context("photosynthesis", EmotionalState::Confident),
            selection(ToolName::FlashcardGenerator),
            &profile("beginner"),
        );

        assert_eq!(params.text("difficulty"), Some("hard"));
        assert_eq!(params.item_count(), Some(7));
        // flashcard_generator does not declare include_advanced_concepts
        assert!(params.get("include_advanced_concepts").is_none());
    }

    #[test]
    fn test_anxious_notes_only_touch_declared() {
        let params = ParameterBuilder::build(
            &context("cell_biology", EmotionalState::Anxious),
            selection(ToolName::NoteMaker),
            &profile("advanced"),
        );

        assert!(params.get("difficulty").is_none());
        assert_eq!(params.flag("include_encouragement"), Some(true));
        assert_eq!(params.text("note_taking_style"), Some("structured"));
        assert_eq!(params.item_count(), None);
    }

    #[test]
    fn test_frustrated_notes_get_analogies() {
        let params = ParameterBuilder::build(
            &context("cell_biology", EmotionalState::Frustrated),
            selection(ToolName::NoteMaker),
            &profile("beginner"),
        );
        assert_eq!(params.flag("include_analogies"), Some(true));
    }

    #[test]
    fn test_explainer_depth_follows_difficulty() {
        let sel = selection(ToolName::ConceptExplainer);
        let neutral = ParameterBuilder::build(
            &context("quantum_mechanics", EmotionalState::Neutral),
            sel,
            &profile("intermediate"),
        );
        let confident = ParameterBuilder::build(
            &context("quantum_mechanics", EmotionalState::Confident),
            sel,
            &profile("intermediate"),
        );
        let frustrated = ParameterBuilder::build(
            &context("quantum_mechanics", EmotionalState::Frustrated),
            sel,
            &profile("intermediate"),
        );

        assert_eq!(neutral.text("desired_depth"), Some("intermediate"));
        assert_eq!(neutral.text("current_topic"), Some("quantum"));
        assert_eq!(neutral.text("concept_to_explain"), Some("quantum_mechanics"));
        assert_eq!(confident.text("desired_depth"), Some("advanced"));
        assert_eq!(confident.flag("include_advanced_concepts"), Some(true));
        assert_eq!(frustrated.text("desired_depth"), Some("basic"));
    }

    #[test]
    fn test_validate_clamps_and_resets() {
        let mut raw = ParamMap::new();
        raw.insert("topic".into(), "algebra".into());
        raw.insert("subject".into(), "algebra".into());
        raw.insert("difficulty".into(), "impossible".into());
        raw.insert("question_type".into(), ParamValue::Int(3));
        raw.insert("num_questions".into(), ParamValue::Int(50));
        raw.insert("include_encouragement".into(), ParamValue::Bool(true));
        raw.insert("mood".into(), "sunny".into());

        let params = validate(&QUIZ_GENERATOR, raw);

        assert_eq!(params.text("difficulty"), Some("medium"));
        assert_eq!(params.text("question_type"), Some("practice"));
        assert_eq!(params.item_count(), Some(10));
        assert_eq!(params.flag("include_advanced_concepts"), Some(false));
        assert!(params.get("mood").is_none());

        let kinds: Vec<(&str, CorrectionKind)> = params
            .corrections()
            .iter()
            .map(|c| (c.param.as_str(), c.kind))
            .collect();
        assert!(kinds.contains(&("difficulty", CorrectionKind::Reset)));
        assert!(kinds.contains(&("question_type", CorrectionKind::Reset)));
        assert!(kinds.contains(&("num_questions", CorrectionKind::Clamped)));
        assert!(kinds.contains(&("include_advanced_concepts", CorrectionKind::Filled)));
        assert!(kinds.contains(&("mood", CorrectionKind::Dropped)));
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_validate_clamps_low_counts() {
        let mut raw = ParamMap::new();
        raw.insert("count".into(), ParamValue::Int(0));
        let params = validate(&FLASHCARD_GENERATOR, raw);
        assert_eq!(params.item_count(), Some(1));
    }

    #[test]
    fn test_adapt_count_bounds_for_every_count() {
        for schema in [&QUIZ_GENERATOR, &FLASHCARD_GENERATOR] {
            let count_param = schema.count_param.unwrap();
            for n in 1..=10 {
                let mut frustrated = ParamMap::new();
                frustrated.insert(count_param.to_string(), ParamValue::Int(n));
                adapt(schema, &mut frustrated, EmotionalState::Frustrated);
                let got = frustrated[count_param].as_int().unwrap();
                assert!(got <= 3 && got <= n && got >= 1, "frustrated n={} got={}", n, got);

                let mut confident = ParamMap::new();
                confident.insert(count_param.to_string(), ParamValue::Int(n));
                adapt(schema, &mut confident, EmotionalState::Confident);
                let got = confident[count_param].as_int().unwrap();
                assert!(got >= n && got <= 10, "confident n={} got={}", n, got);
            }
        }
    }

    #[test]
    fn test_adapt_never_adds_undeclared() {
        for emotion in EmotionalState::ALL {
            let mut params = ParamMap::new();
            adapt(&NOTE_MAKER, &mut params, emotion);
            for name in params.keys() {
                assert!(NOTE_MAKER.declares(name), "{} added {}", emotion, name);
            }

            let mut params = ParamMap::new();
            adapt(&CONCEPT_EXPLAINER, &mut params, emotion);
            for name in params.keys() {
                assert!(CONCEPT_EXPLAINER.declares(name), "{} added {}", emotion, name);
            }
        }
    }
}
