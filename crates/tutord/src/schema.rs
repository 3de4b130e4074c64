//! Tool parameter schemas.
//!
//! Read-only registry describing what each tool accepts: name, type,
//! legal values and default. Validation in `params` is driven entirely
//! by these tables.

use tutor_shared::{ParamValue, ToolName};

/// Lowest and highest item count any tool accepts
pub const MIN_ITEMS: i64 = 1;
pub const MAX_ITEMS: i64 = 10;

/// Item count used when nothing else applies
pub const DEFAULT_ITEMS: i64 = 5;

pub const DIFFICULTY_LEVELS: &[&str] = &["easy", "medium", "hard"];
pub const DEPTH_LEVELS: &[&str] = &["basic", "intermediate", "advanced", "comprehensive"];
pub const QUESTION_TYPES: &[&str] = &["practice", "multiple_choice", "short_answer"];
pub const NOTE_STYLES: &[&str] = &["outline", "bullet_points", "narrative", "structured"];

/// Shape of a parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Free text, filled from the analysis context
    Text,
    Bool,
    Int { min: i64, max: i64 },
    Enum(&'static [&'static str]),
}

/// Default value, kept `'static` so schemas can live in consts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Bool(bool),
    Int(i64),
}

impl DefaultValue {
    pub fn to_value(self) -> ParamValue {
        match self {
            DefaultValue::Text(s) => ParamValue::text(s),
            DefaultValue::Bool(b) => ParamValue::Bool(b),
            DefaultValue::Int(n) => ParamValue::Int(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: DefaultValue,
}

impl ParamSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            default: DefaultValue::Text(""),
        }
    }

    const fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ParamKind::Bool,
            default: DefaultValue::Bool(default),
        }
    }

    const fn items(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int {
                min: MIN_ITEMS,
                max: MAX_ITEMS,
            },
            default: DefaultValue::Int(DEFAULT_ITEMS),
        }
    }

    const fn choice(
        name: &'static str,
        legal: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Enum(legal),
            default: DefaultValue::Text(default),
        }
    }

    pub fn default_value(&self) -> ParamValue {
        self.default.to_value()
    }
}

/// Declared parameters of one tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSchema {
    pub tool: ToolName,
    pub params: &'static [ParamSpec],
    /// Parameter holding the number of generated items, if any
    pub count_param: Option<&'static str>,
}

impl ToolSchema {
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.spec(name).is_some()
    }
}

const DIFFICULTY: ParamSpec = ParamSpec::choice("difficulty", DIFFICULTY_LEVELS, "medium");
const ENCOURAGEMENT: ParamSpec = ParamSpec::flag("include_encouragement", false);
const ADVANCED: ParamSpec = ParamSpec::flag("include_advanced_concepts", false);

pub const QUIZ_GENERATOR: ToolSchema = ToolSchema {
    tool: ToolName::QuizGenerator,
    params: &[
        ParamSpec::text("topic"),
        ParamSpec::text("subject"),
        DIFFICULTY,
        ParamSpec::choice("question_type", QUESTION_TYPES, "practice"),
        ParamSpec::items("num_questions"),
        ENCOURAGEMENT,
        ADVANCED,
    ],
    count_param: Some("num_questions"),
};

pub const FLASHCARD_GENERATOR: ToolSchema = ToolSchema {
    tool: ToolName::FlashcardGenerator,
    params: &[
        ParamSpec::text("topic"),
        ParamSpec::text("subject"),
        DIFFICULTY,
        ParamSpec::items("count"),
        ParamSpec::flag("include_examples", true),
        ENCOURAGEMENT,
    ],
    count_param: Some("count"),
};

pub const NOTE_MAKER: ToolSchema = ToolSchema {
    tool: ToolName::NoteMaker,
    params: &[
        ParamSpec::text("topic"),
        ParamSpec::text("subject"),
        ParamSpec::choice("note_taking_style", NOTE_STYLES, "structured"),
        ParamSpec::flag("include_examples", true),
        ParamSpec::flag("include_analogies", false),
        ENCOURAGEMENT,
    ],
    count_param: None,
};

pub const CONCEPT_EXPLAINER: ToolSchema = ToolSchema {
    tool: ToolName::ConceptExplainer,
    params: &[
        ParamSpec::text("topic"),
        ParamSpec::text("subject"),
        ParamSpec::text("concept_to_explain"),
        ParamSpec::text("current_topic"),
        DIFFICULTY,
        ParamSpec::choice("desired_depth", DEPTH_LEVELS, "intermediate"),
        ADVANCED,
        ENCOURAGEMENT,
    ],
    count_param: None,
};

/// Schema registry lookup
pub fn schema_for(tool: ToolName) -> &'static ToolSchema {
    match tool {
        ToolName::QuizGenerator => &QUIZ_GENERATOR,
        ToolName::FlashcardGenerator => &FLASHCARD_GENERATOR,
        ToolName::NoteMaker => &NOTE_MAKER,
        ToolName::ConceptExplainer => &CONCEPT_EXPLAINER,
    }
}
