//! Deterministic rule-based context extractor.
//!
//! Used whenever the AI path is unavailable. Every classifier is an ordered
//! cue table evaluated by the same first-match routine, so priority lives in
//! the data and not in branching code:
//!
//! - intent: explanation -> notes -> practice -> unknown
//! - emotion: frustrated -> confident -> anxious -> neutral
//!
//! "explain how to solve these problems" is an explanation, and
//! "don't really understand ... well" is frustration, not confidence.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use tutor_shared::{AnalysisContext, ContextSource, EmotionalState, Intent};

/// Inputs longer than this are truncated before matching
pub const MAX_INPUT_CHARS: usize = 2_000;

/// Longest topic kept, in words
pub const MAX_TOPIC_WORDS: usize = 4;

/// Topic used when no content words survive
pub const DEFAULT_TOPIC: &str = "general";

/// Calibrated confidence for a direct intent cue hit
pub const KEYWORD_CONFIDENCE: f32 = 0.6;

/// Calibrated confidence for the default path
pub const DEFAULT_CONFIDENCE: f32 = 0.3;

/// A single cue in a table
#[derive(Debug, Clone, Copy)]
pub enum Cue {
    /// Word-bounded phrase, e.g. "step by step"
    Phrase(&'static str),
    /// Every word present somewhere in the text, e.g. understand + well
    AllOf(&'static [&'static str]),
    /// A verb with a negator shortly before it, e.g. "don't really understand"
    Negated {
        negators: &'static [&'static str],
        verbs: &'static [&'static str],
    },
}

/// How many words before a verb are searched for a negator
pub const NEGATION_WINDOW: usize = 3;

const NEGATORS: &[&str] = &[
    "dont", "didnt", "doesnt", "cant", "cannot", "couldnt", "not", "never", "barely", "hardly",
];

impl Cue {
    fn matches(&self, text: &NormalizedText) -> bool {
        match self {
            Cue::Phrase(phrase) => text.padded.contains(&format!(" {} ", phrase)),
            Cue::AllOf(words) => words.iter().all(|w| text.words.iter().any(|t| t == w)),
            Cue::Negated { negators, verbs } => {
                text.words.iter().enumerate().any(|(i, word)| {
                    verbs.contains(&word.as_str())
                        && text.words[i.saturating_sub(NEGATION_WINDOW)..i]
                            .iter()
                            .any(|w| negators.contains(&w.as_str()))
                })
            }
        }
    }

    fn words(&self) -> Vec<&'static str> {
        match self {
            Cue::Phrase(phrase) => phrase.split(' ').collect(),
            Cue::AllOf(words) => words.to_vec(),
            Cue::Negated { negators, verbs } => {
                negators.iter().chain(verbs.iter()).copied().collect()
            }
        }
    }
}

/// Ordered (label, cues) pairs; earlier rows win
pub type CueTable<L> = [(L, &'static [Cue])];

pub const INTENT_CUES: &CueTable<Intent> = &[
    (
        Intent::Explanation,
        &[
            Cue::Phrase("explain"),
            Cue::Phrase("explanation"),
            Cue::Phrase("how does"),
            Cue::Phrase("how do"),
            Cue::Phrase("step by step"),
            Cue::Phrase("describe"),
            Cue::Phrase("teach me"),
            Cue::Phrase("detailed"),
            Cue::Phrase("what is"),
            Cue::Phrase("walk me through"),
        ],
    ),
    (
        Intent::Notes,
        &[
            Cue::Phrase("notes"),
            Cue::Phrase("note"),
            Cue::Phrase("summary"),
            Cue::Phrase("summarize"),
            Cue::Phrase("summarise"),
            Cue::Phrase("outline"),
            Cue::Phrase("cheat sheet"),
        ],
    ),
    (
        Intent::RequestPracticeProblems,
        &[
            Cue::Phrase("practice"),
            Cue::Phrase("problems"),
            Cue::Phrase("problem"),
            Cue::Phrase("exercises"),
            Cue::Phrase("exercise"),
            Cue::Phrase("quiz"),
            Cue::Phrase("test me"),
            Cue::Phrase("drill"),
        ],
    ),
];

pub const EMOTION_CUES: &CueTable<EmotionalState> = &[
    (
        EmotionalState::Frustrated,
        &[
            Cue::Phrase("struggling"),
            Cue::Phrase("struggle"),
            Cue::Phrase("confused"),
            Cue::Phrase("confusing"),
            Cue::Phrase("hard"),
            Cue::Phrase("stuck"),
            Cue::Phrase("frustrated"),
            Cue::Phrase("frustrating"),
            Cue::Phrase("lost"),
            Cue::Negated {
                negators: NEGATORS,
                verbs: &["understand", "know", "get"],
            },
            Cue::Phrase("doesnt make sense"),
            Cue::Phrase("difficult"),
        ],
    ),
    (
        EmotionalState::Confident,
        &[
            Cue::AllOf(&["understand", "well"]),
            Cue::AllOf(&["know", "well"]),
            Cue::Phrase("easy"),
            Cue::Phrase("advanced"),
            Cue::Phrase("confident"),
            Cue::Phrase("mastered"),
            Cue::Phrase("challenge"),
            Cue::Phrase("challenging"),
        ],
    ),
    (
        EmotionalState::Anxious,
        &[
            Cue::Phrase("worried"),
            Cue::Phrase("worry"),
            Cue::Phrase("nervous"),
            Cue::Phrase("anxious"),
            Cue::Phrase("scared"),
            Cue::Phrase("stressed"),
            Cue::Phrase("panicking"),
            Cue::Phrase("exam tomorrow"),
            Cue::Phrase("test tomorrow"),
        ],
    ),
];

/// Whole-word misspelling corrections, applied before matching
const CORRECTIONS: &[(&str, &str)] = &[
    // cue words
    ("expalin", "explain"),
    ("explian", "explain"),
    ("dificult", "difficult"),
    ("quize", "quiz"),
    ("praktice", "practice"),
    ("practise", "practice"),
    ("summery", "summary"),
    // common subjects
    ("calculas", "calculus"),
    ("calclus", "calculus"),
    ("derivitives", "derivatives"),
    ("derivitive", "derivative"),
    ("photosythesis", "photosynthesis"),
    ("photosynthesys", "photosynthesis"),
    ("fisics", "physics"),
    ("phisics", "physics"),
    ("chemestry", "chemistry"),
    ("geometery", "geometry"),
    ("algerbra", "algebra"),
    ("biologi", "biology"),
    ("trigonometery", "trigonometry"),
];

/// Words that never form part of a topic
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "so", "to", "of", "in", "on", "at", "for",
    "with", "about", "from", "into", "over", "under", "by", "as", "is", "are", "was", "were",
    "be", "been", "being", "am", "do", "does", "did", "doing", "have", "has", "had", "i", "im",
    "ive", "id", "me", "my", "mine", "myself", "you", "youre", "your", "we", "us", "our",
    "they", "them", "their", "it", "its", "this", "that", "these", "those", "there", "here",
    "what", "which", "who", "when", "where", "why", "how", "can", "could", "would", "should",
    "will", "may", "might", "must", "please", "need", "needs", "want", "wants", "wanna",
    "like", "give", "get", "got", "make", "create", "show", "tell", "let", "lets", "some",
    "any", "more", "most", "much", "many", "very", "really", "just", "also", "too", "again",
    "still", "now", "today", "tonight", "tomorrow", "bit", "little", "lot", "lots", "well",
    "good", "understand", "understanding", "know", "learn", "learning", "study", "studying",
    "memorize", "remember", "solve", "solving", "work", "working", "go", "going", "try",
    "trying", "all", "not", "no", "yes", "ok", "okay", "hi", "hello", "hey", "thanks",
    "thank", "dont", "cant", "doesnt", "isnt", "feel", "feeling", "help", "helping", "few",
    "several", "each", "every", "other", "another", "only", "than", "then", "new", "again",
    "fully", "completely", "totally", "quite", "actually", "even",
    // tool and request nouns
    "flashcards", "flashcard", "cards", "card", "quizzes", "questions", "question", "content",
    "material", "materials", "topic", "topics", "subject", "stuff", "things", "thing",
    "something", "lesson", "lessons", "homework", "organized", "organised", "concise",
    "short", "simple", "quick",
];

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Words excluded from topics: stopwords plus every word used by a cue
static NON_TOPIC_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
    for (_, cues) in INTENT_CUES.iter() {
        set.extend(cues.iter().flat_map(|c| c.words()));
    }
    for (_, cues) in EMOTION_CUES.iter() {
        set.extend(cues.iter().flat_map(|c| c.words()));
    }
    set
});

/// Lowercased, punctuation-free, spelling-corrected text
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub words: Vec<String>,
    /// Words joined by single spaces, with a leading and trailing space
    padded: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        if raw.chars().nth(MAX_INPUT_CHARS).is_some() {
            debug!(
                "Input truncated to {} chars before matching ({} total)",
                MAX_INPUT_CHARS,
                raw.chars().count()
            );
        }
        let truncated: String = raw.chars().take(MAX_INPUT_CHARS).collect();
        let lowered = truncated.to_lowercase().replace(['\'', '\u{2019}'], "");
        let spaced = NON_ALNUM.replace_all(&lowered, " ");

        let words: Vec<String> = spaced
            .split_whitespace()
            .map(|w| correct_spelling(w).to_string())
            .collect();
        let padded = format!(" {} ", words.join(" "));

        Self { words, padded }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.padded.trim()
    }
}

/// Apply the static correction table to a single lowercase word
pub fn correct_spelling(word: &str) -> &str {
    CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == word)
        .map(|(_, right)| *right)
        .unwrap_or(word)
}

/// First row whose cues match wins
pub fn first_match<L: Copy>(table: &CueTable<L>, text: &NormalizedText) -> Option<L> {
    table
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| cue.matches(text)))
        .map(|(label, _)| *label)
}

/// Longest run of consecutive content words, joined by `_`
pub fn extract_topic(text: &NormalizedText) -> String {
    let mut best: &[String] = &[];
    let mut start: Option<usize> = None;

    for i in 0..=text.words.len() {
        let is_content = text.words.get(i).is_some_and(|w| is_topic_word(w));
        match (is_content, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s > best.len() {
                    best = &text.words[s..i];
                }
                start = None;
            }
            _ => {}
        }
    }

    if best.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        best.iter()
            .take(MAX_TOPIC_WORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("_")
    }
}

fn is_topic_word(word: &str) -> bool {
    !word.chars().all(|c| c.is_ascii_digit()) && !NON_TOPIC_WORDS.contains(word)
}

/// Rule extractor output (no timestamp, so equal inputs give equal outcomes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub intent: Intent,
    pub topic: String,
    pub emotional_state: EmotionalState,
    pub confidence: f32,
}

impl RuleOutcome {
    pub fn into_context(self) -> AnalysisContext {
        AnalysisContext::new(
            self.intent,
            self.topic,
            self.emotional_state,
            self.confidence,
            ContextSource::RuleFallback,
        )
    }
}

/// Keyword/pattern matcher with fixed calibrated confidences
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    keyword_confidence: f32,
    default_confidence: f32,
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new(KEYWORD_CONFIDENCE, DEFAULT_CONFIDENCE)
    }
}

impl RuleExtractor {
    pub fn new(keyword_confidence: f32, default_confidence: f32) -> Self {
        Self {
            keyword_confidence: tutor_shared::context::clamp_confidence(keyword_confidence),
            default_confidence: tutor_shared::context::clamp_confidence(default_confidence),
        }
    }

    /// Classify raw text. Total: never fails, never panics.
    pub fn extract(&self, raw: &str) -> RuleOutcome {
        let text = NormalizedText::new(raw);
        if text.is_empty() {
            return self.degraded(DEFAULT_TOPIC);
        }

        let intent = first_match(INTENT_CUES, &text);
        let emotional_state =
            first_match(EMOTION_CUES, &text).unwrap_or(EmotionalState::Neutral);
        let topic = extract_topic(&text);

        let confidence = if intent.is_some() {
            self.keyword_confidence
        } else {
            self.default_confidence
        };

        RuleOutcome {
            intent: intent.unwrap_or(Intent::Unknown),
            topic,
            emotional_state,
            confidence,
        }
    }

    fn degraded(&self, topic: &str) -> RuleOutcome {
        RuleOutcome {
            intent: Intent::Unknown,
            topic: topic.to_string(),
            emotional_state: EmotionalState::Neutral,
            confidence: self.default_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> RuleOutcome {
        RuleExtractor::default().extract(text)
    }

    #[test]
    fn test_normalization_strips_punctuation_and_apostrophes() {
        let text = NormalizedText::new("I'm  STUCK -- on Calculas, really!");
        assert_eq!(text.as_str(), "im stuck on calculus really");
    }

    #[test]
    fn test_normalization_truncates_long_input() {
        let long = "algebra ".repeat(1_000);
        let text = NormalizedText::new(&long);
        assert!(text.words.len() <= MAX_INPUT_CHARS / 8 + 1);
    }

    #[test]
    fn test_truncated_input_keeps_leading_cues() {
        let long = format!("quiz me on algebra {}", "filler ".repeat(1_000));
        assert!(long.chars().count() > MAX_INPUT_CHARS);
        let outcome = extract(&long);
        assert_eq!(outcome.intent, Intent::RequestPracticeProblems);
    }

    #[test]
    fn test_phrase_cues_respect_word_boundaries() {
        // "hard" must not fire inside "hardware"
        let outcome = extract("explain computer hardware");
        assert_eq!(outcome.emotional_state, EmotionalState::Neutral);
        assert_eq!(outcome.topic, "computer_hardware");
    }

    #[test]
    fn test_intent_priority_explanation_over_practice() {
        let outcome = extract("explain how to solve these problems step by step");
        assert_eq!(outcome.intent, Intent::Explanation);
    }

    #[test]
    fn test_intent_priority_notes_over_practice() {
        let outcome = extract("summarize the practice problems on fractions");
        assert_eq!(outcome.intent, Intent::Notes);
        assert_eq!(outcome.topic, "fractions");
    }

    #[test]
    fn test_negated_understanding_is_frustration() {
        let outcome = extract("I don't understand recursion well");
        assert_eq!(outcome.emotional_state, EmotionalState::Frustrated);
    }

    #[test]
    fn test_negator_before_verb_with_words_between() {
        for (input, topic) in [
            ("I don't really understand integrals well", "integrals"),
            ("I don't know derivatives well, explain them", "derivatives"),
            ("I do not fully understand algebra well", "algebra"),
            ("I can't understand limits well", "limits"),
        ] {
            let outcome = extract(input);
            assert_eq!(outcome.emotional_state, EmotionalState::Frustrated, "{}", input);
            assert_eq!(outcome.topic, topic, "{}", input);
        }
    }

    #[test]
    fn test_distant_negator_does_not_cancel_confidence() {
        let outcome = extract("not a problem, I understand photosynthesis really well now");
        assert_eq!(outcome.emotional_state, EmotionalState::Confident);
    }

    #[test]
    fn test_anxious_cues() {
        let outcome = extract("I'm nervous about my chemistry exam");
        assert_eq!(outcome.emotional_state, EmotionalState::Anxious);
        assert_eq!(outcome.topic, "chemistry");
    }

    #[test]
    fn test_misspelled_cue_words_are_corrected() {
        let outcome = extract("expalin geometery");
        assert_eq!(outcome.intent, Intent::Explanation);
        assert_eq!(outcome.topic, "geometry");
    }

    #[test]
    fn test_topic_prefers_longest_run() {
        let outcome = extract("I need organized notes about calculus derivatives");
        assert_eq!(outcome.intent, Intent::Notes);
        assert_eq!(outcome.topic, "calculus_derivatives");
    }

    #[test]
    fn test_topic_capped_in_words() {
        let outcome = extract("notes on european medieval feudal economic social history");
        assert_eq!(outcome.topic.split('_').count(), MAX_TOPIC_WORDS);
        assert!(outcome.topic.starts_with("european_medieval"));
    }

    #[test]
    fn test_no_cues_uses_default_confidence() {
        let outcome = extract("I need help with math");
        assert_eq!(outcome.intent, Intent::Unknown);
        assert_eq!(outcome.topic, "math");
        assert_eq!(outcome.emotional_state, EmotionalState::Neutral);
        assert_eq!(outcome.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_empty_input_degrades() {
        for input in ["", "   ", "?!...", "'''"] {
            let outcome = extract(input);
            assert_eq!(outcome.intent, Intent::Unknown);
            assert_eq!(outcome.topic, DEFAULT_TOPIC);
            assert_eq!(outcome.emotional_state, EmotionalState::Neutral);
            assert_eq!(outcome.confidence, DEFAULT_CONFIDENCE);
        }
    }

    #[test]
    fn test_numbers_are_not_topics() {
        let outcome = extract("give me 5 practice problems on algebra");
        assert_eq!(outcome.intent, Intent::RequestPracticeProblems);
        assert_eq!(outcome.topic, "algebra");
    }

    #[test]
    fn test_custom_confidences() {
        let rules = RuleExtractor::new(0.75, 0.25);
        assert_eq!(rules.extract("quiz me on algebra").confidence, 0.75);
        assert_eq!(rules.extract("algebra").confidence, 0.25);
    }

    #[test]
    fn test_outcome_into_context_marks_fallback() {
        let ctx = extract("explain gravity").into_context();
        assert_eq!(ctx.source, ContextSource::RuleFallback);
        assert_eq!(ctx.topic, "gravity");
    }
}
