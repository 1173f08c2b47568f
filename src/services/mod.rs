pub mod evaluator;
pub mod exporter;
pub mod extractor;
pub mod generative;
pub mod lesson;
pub mod questions;
pub mod source;

pub use evaluator::{ResponseEvaluator, TrainingProfile};
pub use exporter::ArtifactExporter;
pub use extractor::{ContentExtractor, DocumentParser, PlainTextParser, UnavailableParser};
pub use generative::{
    service_from_config, CompletionParams, GenerativeTextService, OpenAiService, UnavailableService,
};
pub use lesson::LessonComposer;
pub use questions::{GenerationStage, QuestionGenerator};
pub use source::SourceLoader;

/// First `max_chars` characters of `text`, cut on a char boundary, and
/// whether anything was dropped.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (text[..byte_idx].to_string(), true),
        None => (text.to_string(), false),
    }
}
