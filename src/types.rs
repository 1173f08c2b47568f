use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Content language. Unknown codes resolve to Czech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cs,
    En,
    De,
    Sk,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Language::En,
            "de" | "german" => Language::De,
            "sk" | "slovak" => Language::Sk,
            _ => Language::Cs,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Cs => "cs",
            Language::En => "en",
            Language::De => "de",
            Language::Sk => "sk",
        }
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Language::from_code(s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether a value came from the generative service or a deterministic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Llm,
    Fallback,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Parser,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub pages: Option<usize>,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub extracted_at: DateTime<Utc>,
    pub method: ExtractionMethod,
    pub original_length: usize,
    pub cleaned_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub success: bool,
    pub text: String,
    pub metadata: ExtractionMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredText {
    #[serde(flatten)]
    pub extraction: ExtractedText,
    pub sections: Vec<ContentSection>,
    pub structured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PdfValidation {
    pub fn ok() -> Self {
        Self { valid: true, error: None }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Document information reported by a [`DocumentParser`](crate::services::DocumentParser).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub text: String,
    pub page_count: usize,
    pub info: DocumentInfo,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub max_pages: usize,
    pub parse_timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: 50,
            parse_timeout: Duration::from_secs(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Lessons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonMetadata {
    pub section_count: usize,
    pub estimated_reading_minutes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDocument {
    pub title: String,
    pub body: String,
    pub sections: Vec<LessonSection>,
    pub generated_at: DateTime<Utc>,
    pub source: ContentSource,
    pub language: Language,
    pub metadata: LessonMetadata,
}

#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub max_excerpt_chars: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            max_excerpt_chars: 3000,
            max_tokens: 2000,
            temperature: 0.7,
            timeout: Duration::from_secs(90),
        }
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse_loose(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" | "lehká" | "snadná" | "leicht" => Some(Difficulty::Easy),
            "medium" | "střední" | "mittel" => Some(Difficulty::Medium),
            "hard" | "těžká" | "obtížná" | "schwer" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FreeText,
    FillInBlank,
    Matching,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::FreeText,
        QuestionType::FillInBlank,
        QuestionType::Matching,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::FreeText => "free_text",
            QuestionType::FillInBlank => "fill_in_blank",
            QuestionType::Matching => "matching",
        }
    }

    /// Normalises the spellings models tend to produce ("Multiple Choice",
    /// "multiple-choice", "mcq", "fill_in_the_blank", ...).
    pub fn from_loose(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "multiplechoice" | "mcq" | "choice" | "singlechoice" => Some(QuestionType::MultipleChoice),
            "freetext" | "open" | "openended" | "essay" | "shortanswer" => Some(QuestionType::FreeText),
            "fillinblank" | "fillintheblank" | "fillblank" | "cloze" | "blank" => {
                Some(QuestionType::FillInBlank)
            }
            "matching" | "match" | "pairs" => Some(QuestionType::Matching),
            _ => None,
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        QuestionType::from_loose(s).ok_or_else(|| format!("unknown question type: {}", s))
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        #[serde(rename = "correctAnswer")]
        correct_answer: usize,
    },
    FreeText {
        #[serde(rename = "modelAnswer")]
        model_answer: String,
        #[serde(rename = "keyWords")]
        key_words: Vec<String>,
    },
    FillInBlank {
        answer: String,
        alternatives: Vec<String>,
    },
    Matching {
        pairs: Vec<MatchingPair>,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::FreeText { .. } => QuestionType::FreeText,
            QuestionKind::FillInBlank { .. } => QuestionType::FillInBlank,
            QuestionKind::Matching { .. } => QuestionType::Matching,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: String,
    pub question: String,
    pub difficulty: Difficulty,
    pub explanation: String,
    pub language: Language,
    pub generated_at: DateTime<Utc>,
    pub generated: bool,
    pub source: ContentSource,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl QuestionItem {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }
}

#[derive(Debug, Clone)]
pub struct QuestionOptions {
    pub max_context_chars: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for QuestionOptions {
    fn default() -> Self {
        Self {
            max_context_chars: 4000,
            max_tokens: 2000,
            temperature: 0.7,
            timeout: Duration::from_secs(90),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseLengthStats {
    pub characters: usize,
    pub words: usize,
    pub sentences: usize,
    pub average_words_per_sentence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub completion_percentage: u8,
    pub quality_score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub keyword_matches: Vec<String>,
    pub response_length_stats: ResponseLengthStats,
    pub is_complete: bool,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Caller-side loading and export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceType {
    LocalFile,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub filename: String,
    pub source_type: SourceType,
    pub fetched_at: String,
    pub byte_length: usize,
}

#[derive(Debug, Clone)]
pub struct ExportResult {
    pub output_files: Vec<PathBuf>,
    pub metadata_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("EN"), Language::En);
        assert_eq!(Language::from_code("de"), Language::De);
        assert_eq!(Language::from_code("xx"), Language::Cs);
        assert_eq!("sk".parse::<Language>().unwrap(), Language::Sk);
    }

    #[test]
    fn test_question_type_normalisation() {
        assert_eq!(
            QuestionType::from_loose("Multiple Choice"),
            Some(QuestionType::MultipleChoice)
        );
        assert_eq!(
            QuestionType::from_loose("fill_in_the_blank"),
            Some(QuestionType::FillInBlank)
        );
        assert_eq!(QuestionType::from_loose("free-text"), Some(QuestionType::FreeText));
        assert_eq!(QuestionType::from_loose("riddle"), None);
    }

    #[test]
    fn test_question_item_serializes_with_type_tag() {
        let item = QuestionItem {
            id: "ai_1".to_string(),
            question: "Pick one".to_string(),
            difficulty: Difficulty::Easy,
            explanation: String::new(),
            language: Language::En,
            generated_at: Utc::now(),
            generated: true,
            source: ContentSource::Llm,
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 1,
            },
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswer"], 1);
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["source"], "llm");
        assert!(json["generatedAt"].is_string());
    }
}
