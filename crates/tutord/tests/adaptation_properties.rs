//! Property-style checks for parameter building and the rule extractor.
//!
//! Inputs are enumerated or generated with a small xorshift generator, so
//! runs are deterministic without extra dependencies.

use tutor_shared::{
    AnalysisContext, ContextSource, EmotionalState, Intent, ParamValue, ToolName, ToolSelection,
    UserProfile, Variant,
};
use tutord::params::{adapt, validate, ParamMap, ParameterBuilder};
use tutord::rules::RuleExtractor;
use tutord::schema::{schema_for, ParamKind};

// ============================================================================
// TEST HELPERS
// ============================================================================

struct TestRng {
    state: u64,
}

impl TestRng {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const MASTERY: &[&str] = &[
    "beginner",
    "Intermediate",
    "ADVANCED",
    "Level 1: Foundation",
    "Level 5: Developing",
    "Level 9: Expert",
    "unknown",
    "",
];

const TOPICS: &[&str] = &["algebra", "calculus_derivatives", "general", "a_b_c_d"];

fn context(topic: &str, emotion: EmotionalState) -> AnalysisContext {
    AnalysisContext::new(Intent::Unknown, topic, emotion, 0.5, ContextSource::RuleFallback)
}

fn selection(tool: ToolName) -> ToolSelection {
    ToolSelection {
        tool_name: tool,
        variant: Variant::Standard,
    }
}

fn satisfies_schema(tool: ToolName, params: &ParamMap) -> bool {
    let schema = schema_for(tool);
    params.len() == schema.params.len()
        && schema.params.iter().all(|spec| match (spec.kind, params.get(spec.name)) {
            (ParamKind::Text, Some(ParamValue::Text(_))) => true,
            (ParamKind::Bool, Some(ParamValue::Bool(_))) => true,
            (ParamKind::Int { min, max }, Some(ParamValue::Int(n))) => (min..=max).contains(n),
            (ParamKind::Enum(legal), Some(ParamValue::Text(s))) => legal.contains(&s.as_str()),
            _ => false,
        })
}

// ============================================================================
// Parameter properties
// ============================================================================

#[test]
fn test_built_parameters_always_satisfy_schema() {
    for tool in ToolName::ALL {
        for emotion in EmotionalState::ALL {
            for mastery in MASTERY {
                for topic in TOPICS {
                    let params = ParameterBuilder::build(
                        &context(topic, emotion),
                        selection(tool),
                        &UserProfile::new("u1", *mastery),
                    );
                    assert!(
                        params.corrections().is_empty(),
                        "{} {} {}: {:?}",
                        tool,
                        emotion,
                        mastery,
                        params.corrections()
                    );
                    assert!(satisfies_schema(tool, params.as_map()));
                    assert_eq!(params.text("topic"), Some(*topic));
                }
            }
        }
    }
}

#[test]
fn test_count_adaptation_for_every_starting_count() {
    for tool in [ToolName::QuizGenerator, ToolName::FlashcardGenerator] {
        let schema = schema_for(tool);
        let count_param = schema.count_param.unwrap();

        for n in 1..=10i64 {
            for emotion in EmotionalState::ALL {
                let mut params = ParamMap::new();
                params.insert(count_param.to_string(), ParamValue::Int(n));
                adapt(schema, &mut params, emotion);
                let validated = validate(schema, params);
                let got = validated.item_count().unwrap();

                match emotion {
                    EmotionalState::Frustrated => assert_eq!(got, n.min(3)),
                    EmotionalState::Confident => assert_eq!(got, (n + 2).min(10)),
                    _ => assert_eq!(got, n),
                }
            }
        }
    }
}

#[test]
fn test_supportive_states_lower_difficulty() {
    for tool in [
        ToolName::QuizGenerator,
        ToolName::FlashcardGenerator,
        ToolName::ConceptExplainer,
    ] {
        for emotion in [EmotionalState::Frustrated, EmotionalState::Anxious] {
            let params = ParameterBuilder::build(
                &context("algebra", emotion),
                selection(tool),
                &UserProfile::new("u1", "advanced"),
            );
            assert_eq!(params.text("difficulty"), Some("easy"));
            assert_eq!(params.flag("include_encouragement"), Some(true));
        }
    }
}

#[test]
fn test_validation_repairs_arbitrary_maps() {
    let mut rng = TestRng::new(42);
    let keys = [
        "topic",
        "difficulty",
        "count",
        "num_questions",
        "desired_depth",
        "note_taking_style",
        "include_examples",
        "bogus",
    ];

    for _ in 0..500 {
        let mut raw = ParamMap::new();
        for _ in 0..(rng.next_u64() % 6) {
            let key = rng.pick(&keys);
            let value = match rng.next_u64() % 3 {
                0 => ParamValue::Int(rng.next_u64() as i64 % 100 - 50),
                1 => ParamValue::Bool(rng.next_u64() % 2 == 0),
                _ => ParamValue::text(rng.pick(&["easy", "hard", "outline", "deep", ""])),
            };
            raw.insert(key.to_string(), value);
        }

        for tool in ToolName::ALL {
            let validated = validate(schema_for(tool), raw.clone());
            assert!(satisfies_schema(tool, validated.as_map()));
        }
    }
}

// ============================================================================
// Rule extractor properties
// ============================================================================

#[test]
fn test_rule_extractor_is_total() {
    let extractor = RuleExtractor::default();
    let mut rng = TestRng::new(7);
    let fragments = [
        "explain", "notes", "quiz", "I'm", "stuck", "well", "understand", "émile", "数学", "!!!",
        "  ", "\n", "step", "by", "42", "calculus", "'", "-",
    ];

    for _ in 0..1000 {
        let len = rng.next_u64() % 12;
        let text: Vec<&str> = (0..len).map(|_| rng.pick(&fragments)).collect();
        let text = text.join(" ");

        let outcome = extractor.extract(&text);
        assert!(Intent::ALL.contains(&outcome.intent));
        assert!(EmotionalState::ALL.contains(&outcome.emotional_state));
        assert!(!outcome.topic.is_empty());
        assert!((0.0..=1.0).contains(&outcome.confidence));
    }
}

#[test]
fn test_rule_extractor_is_deterministic() {
    let extractor = RuleExtractor::default();
    for text in [
        "I'm struggling with calculus derivatives and need practice problems",
        "summarize the french revolution",
        "",
    ] {
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}

#[test]
fn test_very_long_input_is_bounded() {
    let extractor = RuleExtractor::default();
    let text = "algebra ".repeat(10_000) + "explain";
    let outcome = extractor.extract(&text);
    // the trailing cue is past the input cap
    assert_eq!(outcome.intent, Intent::Unknown);
    assert_eq!(outcome.topic, "algebra_algebra_algebra_algebra");
}
