//! Loose model output to strict [`QuestionItem`] values.
//!
//! Every field the model may have produced is first read into a
//! [`RawQuestion`] with tolerant coercions. Per-variant rule tables then fill
//! whatever is still missing, so no partially valid item ever leaves here.

use crate::types::{
    ContentSource, Difficulty, Language, MatchingPair, QuestionItem, QuestionKind, QuestionType,
};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

pub const MIN_OPTIONS: usize = 2;
pub const PADDED_OPTIONS: usize = 4;
pub const MIN_PAIRS: usize = 2;

/// Localized filler text used when a field cannot be recovered.
pub struct Placeholders {
    pub option: &'static str,
    pub term: &'static str,
    pub definition: &'static str,
    pub model_answer: &'static str,
    pub blank_answer: &'static str,
    pub fallback_question: &'static str,
    pub fallback_explanation: &'static str,
    pub fallback_keyword: &'static str,
}

const CS: Placeholders = Placeholders {
    option: "Možnost",
    term: "Pojem",
    definition: "Definice",
    model_answer: "Vzorová odpověď není k dispozici.",
    blank_answer: "odpověď",
    fallback_question: "Vygenerovaná otázka k tématu",
    fallback_explanation: "Toto je náhradní otázka. Upravte ji podle potřeby.",
    fallback_keyword: "náhradní",
};

const EN: Placeholders = Placeholders {
    option: "Option",
    term: "Term",
    definition: "Definition",
    model_answer: "No model answer is available.",
    blank_answer: "answer",
    fallback_question: "Generated question about",
    fallback_explanation: "This is a placeholder question. Edit it as needed.",
    fallback_keyword: "placeholder",
};

const DE: Placeholders = Placeholders {
    option: "Option",
    term: "Begriff",
    definition: "Definition",
    model_answer: "Keine Musterantwort verfügbar.",
    blank_answer: "Antwort",
    fallback_question: "Generierte Frage zum Thema",
    fallback_explanation: "Dies ist eine Ersatzfrage. Passen Sie sie nach Bedarf an.",
    fallback_keyword: "Ersatz",
};

const SK: Placeholders = Placeholders {
    option: "Možnosť",
    term: "Pojem",
    definition: "Definícia",
    model_answer: "Vzorová odpoveď nie je k dispozícii.",
    blank_answer: "odpoveď",
    fallback_question: "Vygenerovaná otázka k téme",
    fallback_explanation: "Toto je náhradná otázka. Upravte ju podľa potreby.",
    fallback_keyword: "náhradná",
};

pub fn placeholders(language: Language) -> &'static Placeholders {
    match language {
        Language::Cs => &CS,
        Language::En => &EN,
        Language::De => &DE,
        Language::Sk => &SK,
    }
}

/// `Option A` .. `Option Z` in the requested language.
pub fn option_placeholder(language: Language, index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("{} {}", placeholders(language).option, letter)
}

pub fn pair_placeholder(language: Language, index: usize) -> MatchingPair {
    let words = placeholders(language);
    MatchingPair {
        term: format!("{} {}", words.term, index + 1),
        definition: format!("{} {}", words.definition, index + 1),
    }
}

pub struct RepairContext<'a> {
    pub topic: &'a str,
    pub language: Language,
}

impl<'a> RepairContext<'a> {
    pub fn new(topic: &'a str, language: Language) -> Self {
        Self { topic, language }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPair {
    pub term: String,
    pub definition: String,
}

/// Everything a model might have sent for one question, before any variant
/// is decided.
#[derive(Debug, Clone, Default)]
pub struct RawQuestion {
    pub declared_type: Option<String>,
    pub question: Option<String>,
    pub options: Vec<String>,
    pub correct_answer: Option<Value>,
    pub model_answer: Option<String>,
    pub answer: Option<String>,
    pub alternatives: Vec<String>,
    pub key_words: Vec<String>,
    pub pairs: Vec<RawPair>,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
    /// Options the model actually sent, set once placeholders are appended.
    pub supplied_options: Option<usize>,
}

impl RawQuestion {
    /// `None` for anything that is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            declared_type: first_text(object, &["type", "questionType", "question_type", "kind"]),
            question: first_text(object, &["question", "text", "prompt"]),
            options: first_list(object, &["options", "choices", "answers"]),
            correct_answer: first_present(object, &["correctAnswer", "correct_answer", "correct"]).cloned(),
            model_answer: first_text(object, &["modelAnswer", "model_answer", "sampleAnswer"]),
            answer: first_text(object, &["answer", "blank"]),
            alternatives: first_list(object, &["alternatives", "acceptedAnswers", "accepted_answers"]),
            key_words: first_list(object, &["keyWords", "key_words", "keywords"]),
            pairs: first_present(object, &["pairs", "matches"])
                .map(pairs_from_value)
                .unwrap_or_default(),
            explanation: first_text(object, &["explanation", "rationale"]),
            difficulty: first_text(object, &["difficulty", "level"]),
            supplied_options: None,
        })
    }

    /// The declared type when the item carries that variant's content or no
    /// content at all, otherwise the type inferred from the fields that are
    /// present. Unknown shapes become multiple choice.
    pub fn resolve_type(&self) -> QuestionType {
        let inferred = self.inferred_type();
        match self.declared_type.as_deref().and_then(QuestionType::from_loose) {
            Some(declared) if self.has_content_for(declared) => declared,
            Some(declared) => inferred.unwrap_or(declared),
            None => inferred.unwrap_or(QuestionType::MultipleChoice),
        }
    }

    fn inferred_type(&self) -> Option<QuestionType> {
        [
            QuestionType::Matching,
            QuestionType::MultipleChoice,
            QuestionType::FillInBlank,
            QuestionType::FreeText,
        ]
        .into_iter()
        .find(|question_type| self.has_content_for(*question_type))
    }

    fn has_content_for(&self, question_type: QuestionType) -> bool {
        match question_type {
            QuestionType::Matching => !self.pairs.is_empty(),
            QuestionType::MultipleChoice => !self.options.is_empty(),
            QuestionType::FillInBlank => {
                !self.alternatives.is_empty()
                    || self.answer.is_some()
                    || self.question.as_deref().is_some_and(|q| q.contains("___"))
            }
            QuestionType::FreeText => self.model_answer.is_some() || !self.key_words.is_empty(),
        }
    }

    /// Indices at or past this bound point at placeholder options.
    fn answerable_options(&self) -> usize {
        self.supplied_options.unwrap_or(self.options.len())
    }

    fn correct_answer_text(&self) -> Option<String> {
        self.correct_answer.as_ref().and_then(as_text)
    }
}

/// A named, independently testable repair step. `apply` reports whether it
/// changed anything.
pub struct RepairRule {
    pub name: &'static str,
    pub apply: fn(&mut RawQuestion, &RepairContext<'_>) -> bool,
}

pub const SHARED_RULES: &[RepairRule] = &[
    RepairRule {
        name: "question_text",
        apply: repair_question_text,
    },
    RepairRule {
        name: "difficulty",
        apply: repair_difficulty,
    },
];

pub const MULTIPLE_CHOICE_RULES: &[RepairRule] = &[
    RepairRule {
        name: "pad_options",
        apply: pad_options,
    },
    RepairRule {
        name: "resolve_correct_answer",
        apply: resolve_correct_answer,
    },
];

pub const FREE_TEXT_RULES: &[RepairRule] = &[RepairRule {
    name: "model_answer",
    apply: repair_model_answer,
}];

pub const FILL_IN_BLANK_RULES: &[RepairRule] = &[RepairRule {
    name: "blank_answer",
    apply: repair_blank_answer,
}];

pub const MATCHING_RULES: &[RepairRule] = &[
    RepairRule {
        name: "drop_incomplete_pairs",
        apply: drop_incomplete_pairs,
    },
    RepairRule {
        name: "pad_pairs",
        apply: pad_pairs,
    },
];

pub fn rules_for(question_type: QuestionType) -> &'static [RepairRule] {
    match question_type {
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_RULES,
        QuestionType::FreeText => FREE_TEXT_RULES,
        QuestionType::FillInBlank => FILL_IN_BLANK_RULES,
        QuestionType::Matching => MATCHING_RULES,
    }
}

/// Turns one element of the model's array into a complete item, or `None`
/// when the element is not an object.
pub fn validate_and_repair(value: &Value, ctx: &RepairContext<'_>) -> Option<QuestionItem> {
    let Some(mut raw) = RawQuestion::from_value(value) else {
        debug!("Skipping non-object question element");
        return None;
    };

    let id = format!("ai_{}", Uuid::new_v4().simple());
    let question_type = raw.resolve_type();

    if raw.declared_type.as_deref().and_then(QuestionType::from_loose) != Some(question_type) {
        warn!(
            "Question {} has type {:?}, treating it as {}",
            id, raw.declared_type, question_type
        );
    }

    for rule in SHARED_RULES.iter().chain(rules_for(question_type)) {
        if (rule.apply)(&mut raw, ctx) {
            warn!("Repaired question {} with rule {}", id, rule.name);
        }
    }

    Some(assemble(id, question_type, raw, ctx.language))
}

fn assemble(id: String, question_type: QuestionType, raw: RawQuestion, language: Language) -> QuestionItem {
    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse_loose)
        .unwrap_or_default();

    let kind = match question_type {
        QuestionType::MultipleChoice => {
            let correct_answer = raw
                .correct_answer
                .as_ref()
                .and_then(as_index)
                .filter(|n| *n < raw.answerable_options())
                .unwrap_or(0);
            QuestionKind::MultipleChoice {
                options: raw.options,
                correct_answer,
            }
        }
        QuestionType::FreeText => QuestionKind::FreeText {
            model_answer: raw.model_answer.unwrap_or_default(),
            key_words: raw.key_words,
        },
        QuestionType::FillInBlank => QuestionKind::FillInBlank {
            answer: raw.answer.unwrap_or_default(),
            alternatives: raw.alternatives,
        },
        QuestionType::Matching => QuestionKind::Matching {
            pairs: raw
                .pairs
                .into_iter()
                .map(|p| MatchingPair {
                    term: p.term,
                    definition: p.definition,
                })
                .collect(),
        },
    };

    QuestionItem {
        id,
        question: raw.question.unwrap_or_default(),
        difficulty,
        explanation: raw.explanation.unwrap_or_default(),
        language,
        generated_at: Utc::now(),
        generated: true,
        source: ContentSource::Llm,
        kind,
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn repair_question_text(raw: &mut RawQuestion, ctx: &RepairContext<'_>) -> bool {
    if raw.question.is_some() {
        return false;
    }
    raw.question = Some(ctx.topic.trim().to_string());
    true
}

fn repair_difficulty(raw: &mut RawQuestion, _ctx: &RepairContext<'_>) -> bool {
    if raw.difficulty.as_deref().and_then(Difficulty::parse_loose).is_some() {
        return false;
    }
    raw.difficulty = Some("medium".to_string());
    true
}

fn pad_options(raw: &mut RawQuestion, ctx: &RepairContext<'_>) -> bool {
    if raw.options.len() >= MIN_OPTIONS {
        return false;
    }
    raw.supplied_options = Some(raw.options.len());
    while raw.options.len() < PADDED_OPTIONS {
        let next = option_placeholder(ctx.language, raw.options.len());
        raw.options.push(next);
    }
    true
}

/// Index in range, then exact option text, then case-insensitive option
/// text, then a letter. Anything else points at the first option.
pub fn correct_index(answer: Option<&Value>, options: &[String]) -> Option<usize> {
    let in_range = |n: usize| (n < options.len()).then_some(n);

    match answer? {
        number @ Value::Number(_) => as_index(number).and_then(in_range),
        Value::String(s) => {
            let wanted = s.trim();
            if wanted.is_empty() {
                return None;
            }
            if let Some(pos) = options.iter().position(|o| o.trim() == wanted) {
                return Some(pos);
            }
            let lowered = wanted.to_lowercase();
            if let Some(pos) = options.iter().position(|o| o.trim().to_lowercase() == lowered) {
                return Some(pos);
            }
            let mut chars = wanted.chars();
            if let (Some(letter), None) = (chars.next(), chars.next()) {
                if letter.is_ascii_alphabetic() {
                    return in_range((letter.to_ascii_uppercase() as u8 - b'A') as usize);
                }
            }
            wanted.parse::<usize>().ok().and_then(in_range)
        }
        _ => None,
    }
}

fn resolve_correct_answer(raw: &mut RawQuestion, _ctx: &RepairContext<'_>) -> bool {
    let supplied = &raw.options[..raw.answerable_options()];
    let already_index = raw
        .correct_answer
        .as_ref()
        .and_then(as_index)
        .is_some_and(|n| n < supplied.len());
    if already_index {
        return false;
    }

    let resolved = correct_index(raw.correct_answer.as_ref(), supplied);
    let repaired = resolved.is_none();
    raw.correct_answer = Some(Value::from(resolved.unwrap_or(0)));
    // Text or letter answers are normal model output, only a miss is a repair.
    repaired
}

fn repair_model_answer(raw: &mut RawQuestion, ctx: &RepairContext<'_>) -> bool {
    if raw.model_answer.is_some() {
        return false;
    }

    if let Some(answer) = raw.correct_answer_text().or_else(|| raw.answer.clone()) {
        raw.model_answer = Some(answer);
        return false;
    }

    raw.model_answer = Some(
        raw.explanation
            .clone()
            .unwrap_or_else(|| placeholders(ctx.language).model_answer.to_string()),
    );
    true
}

fn repair_blank_answer(raw: &mut RawQuestion, ctx: &RepairContext<'_>) -> bool {
    if raw.answer.is_some() {
        return false;
    }

    if let Some(answer) = raw.correct_answer_text() {
        raw.answer = Some(answer);
        return false;
    }

    raw.answer = Some(
        raw.alternatives
            .first()
            .cloned()
            .unwrap_or_else(|| placeholders(ctx.language).blank_answer.to_string()),
    );
    true
}

fn drop_incomplete_pairs(raw: &mut RawQuestion, _ctx: &RepairContext<'_>) -> bool {
    let before = raw.pairs.len();
    raw.pairs
        .retain(|p| !p.term.trim().is_empty() && !p.definition.trim().is_empty());
    raw.pairs.len() != before
}

fn pad_pairs(raw: &mut RawQuestion, ctx: &RepairContext<'_>) -> bool {
    if raw.pairs.len() >= MIN_PAIRS {
        return false;
    }
    while raw.pairs.len() < MIN_PAIRS {
        let pair = pair_placeholder(ctx.language, raw.pairs.len());
        raw.pairs.push(RawPair {
            term: pair.term,
            definition: pair.definition,
        });
    }
    true
}

// ---------------------------------------------------------------------------
// Coercions
// ---------------------------------------------------------------------------

fn first_present<'v>(object: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| object.get(*key)).find_map(as_text)
}

fn first_list(object: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .map(as_text_list)
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// Non-empty trimmed text from strings, numbers, booleans or `{text|label|value}`
/// objects.
/// Non-negative integers, including integral floats such as `2.0`.
fn as_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= usize::MAX as f64)
        .map(|f| f as usize)
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(object) => return first_text(object, &["text", "label", "value"]),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Arrays element-wise; a plain string is split on commas.
fn as_text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        other => as_text(other).into_iter().collect(),
    }
}

fn pairs_from_value(value: &Value) -> Vec<RawPair> {
    match value {
        Value::Array(items) => items.iter().filter_map(pair_from_value).collect(),
        Value::Object(object) => object
            .iter()
            .map(|(term, definition)| RawPair {
                term: term.trim().to_string(),
                definition: as_text(definition).unwrap_or_default(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn pair_from_value(value: &Value) -> Option<RawPair> {
    match value {
        Value::Object(object) => Some(RawPair {
            term: first_text(object, &["term", "left", "key"]).unwrap_or_default(),
            definition: first_text(object, &["definition", "right", "value"]).unwrap_or_default(),
        }),
        Value::Array(parts) => Some(RawPair {
            term: parts.first().and_then(as_text).unwrap_or_default(),
            definition: parts.get(1).and_then(as_text).unwrap_or_default(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RepairContext<'static> {
        RepairContext::new("Photosynthesis", Language::Cs)
    }

    fn raw(value: Value) -> RawQuestion {
        RawQuestion::from_value(&value).unwrap()
    }

    #[test]
    fn test_non_objects_are_skipped() {
        assert!(validate_and_repair(&json!("just text"), &ctx()).is_none());
        assert!(validate_and_repair(&json!(42), &ctx()).is_none());
    }

    #[test]
    fn test_type_normalisation_and_inference() {
        assert_eq!(raw(json!({"type": "Multiple Choice"})).resolve_type(), QuestionType::MultipleChoice);
        assert_eq!(raw(json!({"type": "fill_in_the_blank"})).resolve_type(), QuestionType::FillInBlank);
        assert_eq!(
            raw(json!({"pairs": [{"term": "a", "definition": "b"}]})).resolve_type(),
            QuestionType::Matching
        );
        assert_eq!(raw(json!({"question": "The sky is ___."})).resolve_type(), QuestionType::FillInBlank);
        assert_eq!(raw(json!({"modelAnswer": "x"})).resolve_type(), QuestionType::FreeText);
        assert_eq!(raw(json!({"type": "riddle"})).resolve_type(), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_tolerant_coercions() {
        let question = raw(json!({
            "question": 7,
            "keyWords": "light, chlorophyll , ",
            "options": [1, "two", {"text": "three"}, null]
        }));
        assert_eq!(question.question.as_deref(), Some("7"));
        assert_eq!(question.key_words, vec!["light", "chlorophyll"]);
        assert_eq!(question.options, vec!["1", "two", "three"]);
    }

    #[test]
    fn test_correct_index_resolution() {
        let options: Vec<String> = ["Red", "Green", "Blue"].iter().map(|s| s.to_string()).collect();

        assert_eq!(correct_index(Some(&json!(2)), &options), Some(2));
        assert_eq!(correct_index(Some(&json!(5)), &options), None);
        assert_eq!(correct_index(Some(&json!("Green")), &options), Some(1));
        assert_eq!(correct_index(Some(&json!("blue")), &options), Some(2));
        assert_eq!(correct_index(Some(&json!("b")), &options), Some(1));
        assert_eq!(correct_index(Some(&json!("Z")), &options), None);
        assert_eq!(correct_index(Some(&json!("Purple")), &options), None);
        assert_eq!(correct_index(None, &options), None);
    }

    #[test]
    fn test_pad_options_keeps_existing_option() {
        let mut question = raw(json!({"options": ["Chlorofyl"]}));
        assert!(pad_options(&mut question, &ctx()));
        assert_eq!(question.options, vec!["Chlorofyl", "Možnost B", "Možnost C", "Možnost D"]);

        let mut full = raw(json!({"options": ["a", "b"]}));
        assert!(!pad_options(&mut full, &ctx()));
    }

    #[test]
    fn test_multiple_choice_repair_invariants() {
        let item = validate_and_repair(&json!({"type": "multiple_choice", "correctAnswer": "nothing"}), &ctx())
            .unwrap();

        assert_eq!(item.question, "Photosynthesis");
        assert_eq!(item.difficulty, Difficulty::Medium);
        assert!(item.generated);
        assert!(item.id.starts_with("ai_"));
        match item.kind {
            QuestionKind::MultipleChoice { options, correct_answer } => {
                assert_eq!(options.len(), 4);
                assert_eq!(correct_answer, 0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_free_text_model_answer_sources() {
        let mut from_correct = raw(json!({"correctAnswer": "Light energy"}));
        repair_model_answer(&mut from_correct, &ctx());
        assert_eq!(from_correct.model_answer.as_deref(), Some("Light energy"));

        let mut from_explanation = raw(json!({"explanation": "Mention light"}));
        assert!(repair_model_answer(&mut from_explanation, &ctx()));
        assert_eq!(from_explanation.model_answer.as_deref(), Some("Mention light"));

        let mut placeholder = raw(json!({}));
        assert!(repair_model_answer(&mut placeholder, &RepairContext::new("t", Language::En)));
        assert_eq!(placeholder.model_answer.as_deref(), Some("No model answer is available."));
    }

    #[test]
    fn test_blank_answer_from_alternatives() {
        let mut question = raw(json!({"alternatives": ["glucose", "sugar"]}));
        assert!(repair_blank_answer(&mut question, &ctx()));
        assert_eq!(question.answer.as_deref(), Some("glucose"));
    }

    #[test]
    fn test_matching_pairs_dropped_and_padded() {
        let item = validate_and_repair(
            &json!({
                "type": "matching",
                "pairs": [
                    {"term": "CO2", "definition": "Input gas"},
                    {"term": "O2"},
                    ["Light", ""]
                ]
            }),
            &ctx(),
        )
        .unwrap();

        match item.kind {
            QuestionKind::Matching { pairs } => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].term, "CO2");
                assert_eq!(pairs[1].term, "Pojem 2");
                assert_eq!(pairs[1].definition, "Definice 2");
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_declared_type_contradicted_by_fields() {
        let item = validate_and_repair(
            &json!({
                "type": "matching",
                "options": ["Oxygen", "Nitrogen", "Helium", "Argon"],
                "correctAnswer": 0
            }),
            &ctx(),
        )
        .unwrap();

        match item.kind {
            QuestionKind::MultipleChoice { options, correct_answer } => {
                assert_eq!(options, vec!["Oxygen", "Nitrogen", "Helium", "Argon"]);
                assert_eq!(correct_answer, 0);
            }
            other => panic!("unexpected kind {:?}", other),
        }

        // declared type kept when its own content is present or nothing else is
        assert_eq!(
            raw(json!({"type": "free_text", "modelAnswer": "x", "options": ["a", "b"]})).resolve_type(),
            QuestionType::FreeText
        );
        assert_eq!(raw(json!({"type": "matching", "question": "q"})).resolve_type(), QuestionType::Matching);
    }

    #[test]
    fn test_integral_float_correct_answer() {
        let options: Vec<String> = ["Red", "Green", "Blue"].iter().map(|s| s.to_string()).collect();
        assert_eq!(correct_index(Some(&json!(2.0)), &options), Some(2));
        assert_eq!(correct_index(Some(&json!(1.5)), &options), None);
        assert_eq!(correct_index(Some(&json!(-1)), &options), None);

        let item = validate_and_repair(
            &json!({"options": ["Red", "Green", "Blue"], "correctAnswer": 2.0}),
            &ctx(),
        )
        .unwrap();
        assert!(matches!(item.kind, QuestionKind::MultipleChoice { correct_answer: 2, .. }));
    }

    #[test]
    fn test_correct_answer_never_points_at_placeholder() {
        let item = validate_and_repair(
            &json!({"options": ["Chlorofyl"], "correctAnswer": 2}),
            &ctx(),
        )
        .unwrap();

        match item.kind {
            QuestionKind::MultipleChoice { options, correct_answer } => {
                assert_eq!(options.len(), 4);
                assert_eq!(correct_answer, 0);
                assert_eq!(options[correct_answer], "Chlorofyl");
            }
            other => panic!("unexpected kind {:?}", other),
        }

        let by_text = validate_and_repair(
            &json!({"options": ["Chlorofyl"], "correctAnswer": "Možnost C"}),
            &ctx(),
        )
        .unwrap();
        assert!(matches!(by_text.kind, QuestionKind::MultipleChoice { correct_answer: 0, .. }));
    }

    #[test]
    fn test_every_rule_table_is_named() {
        for question_type in QuestionType::ALL {
            assert!(!rules_for(question_type).is_empty());
            assert!(rules_for(question_type).iter().all(|rule| !rule.name.is_empty()));
        }
    }
}
