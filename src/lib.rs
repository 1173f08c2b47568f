//! # Lesson Forge
//!
//! Turns uploaded documents into structured lessons and typed assessment
//! questions, and scores learners' free-text answers deterministically.
//! Every entry point degrades to a deterministic fallback when the
//! generative service or the document parser is unavailable.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lesson_forge::{Language, Pipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = Pipeline::from_env();
//!
//!     let extracted = pipeline.extract_text(b"Kapitola 1\n\nBezpecnost prace.").await;
//!     let lesson = pipeline
//!         .compose_lesson(&extracted.text, "Bezpecnost", Language::Cs)
//!         .await;
//!     let questions = pipeline
//!         .generate_questions("Bezpecnost", &lesson.body, &[], Language::Cs)
//!         .await;
//!
//!     let result = pipeline.evaluate_response(
//!         "What is your name?",
//!         "My name is John and I live in Prague with my family.",
//!         "english_basic",
//!     );
//!     println!("{} questions, completion {}%", questions.len(), result.completion_percentage);
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use config::{ScoreTier, ScoringConfig, ServiceConfig};
pub use error::{ForgeError, Result};
pub use pipeline::Pipeline;
pub use services::{
    ArtifactExporter, ContentExtractor, DocumentParser, GenerativeTextService, LessonComposer, QuestionGenerator,
    ResponseEvaluator, SourceLoader, TrainingProfile,
};
pub use types::{
    ContentSection, ContentSource, Difficulty, EvaluationResult, ExtractedText, Language, LessonDocument,
    PdfValidation, QuestionItem, QuestionKind, QuestionType, StructuredText,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
