use crate::config::{ScoringConfig, ServiceConfig};
use crate::services::{
    service_from_config, ContentExtractor, DocumentParser, GenerativeTextService, LessonComposer, PlainTextParser,
    QuestionGenerator, ResponseEvaluator, UnavailableService,
};
use crate::types::{
    ComposeOptions, EvaluationResult, ExtractOptions, ExtractedText, Language, LessonDocument, PdfValidation,
    QuestionItem, QuestionOptions, QuestionType, StructuredText,
};
use std::sync::Arc;
use tracing::{info, warn};

/// One instance of every component behind a single set of entry points.
/// None of them fail: each degrades to its deterministic fallback.
pub struct Pipeline {
    extractor: ContentExtractor,
    composer: LessonComposer,
    generator: QuestionGenerator,
    evaluator: ResponseEvaluator,
    generative_available: bool,
    extract_options: ExtractOptions,
    compose_options: ComposeOptions,
    question_options: QuestionOptions,
}

impl Pipeline {
    pub fn new(service: Arc<dyn GenerativeTextService>, parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            generative_available: service.is_available(),
            extractor: ContentExtractor::new(parser),
            composer: LessonComposer::new(service.clone()),
            generator: QuestionGenerator::new(service),
            evaluator: ResponseEvaluator::default(),
            extract_options: ExtractOptions::default(),
            compose_options: ComposeOptions::default(),
            question_options: QuestionOptions::default(),
        }
    }

    /// Generative service from the environment, plain-text document parser.
    pub fn from_env() -> Self {
        let config = ServiceConfig::from_env();
        match &config {
            Some(config) => info!("Generative service configured with model {}", config.model),
            None => warn!("OPENAI_API_KEY not set, lessons and questions will use fallback templates"),
        }
        Self::new(service_from_config(config), Arc::new(PlainTextParser))
    }

    /// No generative service; every generation call takes the fallback path.
    pub fn offline() -> Self {
        Self::new(Arc::new(UnavailableService), Arc::new(PlainTextParser))
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.evaluator = ResponseEvaluator::new(scoring);
        self
    }

    #[must_use]
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    #[must_use]
    pub fn with_compose_options(mut self, options: ComposeOptions) -> Self {
        self.compose_options = options;
        self
    }

    #[must_use]
    pub fn with_question_options(mut self, options: QuestionOptions) -> Self {
        self.question_options = options;
        self
    }

    pub fn is_generative_available(&self) -> bool {
        self.generative_available
    }

    pub fn extractor(&self) -> &ContentExtractor {
        &self.extractor
    }

    pub async fn extract_text(&self, bytes: &[u8]) -> ExtractedText {
        self.extractor.extract_text(bytes, &self.extract_options).await
    }

    pub async fn extract_structured_text(&self, bytes: &[u8]) -> StructuredText {
        self.extractor
            .extract_structured_text(bytes, &self.extract_options)
            .await
    }

    pub fn validate_pdf(&self, bytes: &[u8]) -> PdfValidation {
        ContentExtractor::validate_pdf(bytes)
    }

    pub async fn compose_lesson(&self, raw_content: &str, title: &str, language: Language) -> LessonDocument {
        self.composer
            .compose(raw_content, title, language, &self.compose_options)
            .await
    }

    pub async fn extract_key_topics(&self, content: &str, language: Language) -> Vec<String> {
        self.composer.extract_key_topics(content, language).await
    }

    pub async fn generate_questions(
        &self,
        topic: &str,
        context: &str,
        requested_types: &[QuestionType],
        language: Language,
    ) -> Vec<QuestionItem> {
        self.generator
            .generate(topic, context, requested_types, language, &self.question_options)
            .await
    }

    /// Czech feedback.
    pub fn evaluate_response(&self, question: &str, answer: &str, training_type: &str) -> EvaluationResult {
        self.evaluator.evaluate(question, answer, training_type)
    }

    pub fn evaluate_response_in(
        &self,
        question: &str,
        answer: &str,
        training_type: &str,
        language: Language,
    ) -> EvaluationResult {
        self.evaluator
            .evaluate_in(question, answer, training_type, language)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generative::testing::ScriptedService;
    use crate::types::{ContentSource, ExtractionMethod, QuestionKind};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_pipeline_is_shareable() {
        assert_send_sync::<Pipeline>();
    }

    #[tokio::test]
    async fn test_offline_pipeline_is_total() {
        let pipeline = Pipeline::offline();
        assert!(!pipeline.is_generative_available());

        let lesson = pipeline.compose_lesson("Obsah.", "Lekce", Language::Cs).await;
        assert_eq!(lesson.source, ContentSource::Fallback);
        assert_eq!(lesson.sections.len(), 4);

        let questions = pipeline
            .generate_questions("Photosynthesis", "", &[], Language::Cs)
            .await;
        assert_eq!(questions.len(), 1);
        assert!(matches!(
            &questions[0].kind,
            QuestionKind::MultipleChoice { options, .. } if options.len() == 4
        ));

        let evaluation = pipeline.evaluate_response("Why?", "", "basic");
        assert_eq!(evaluation.completion_percentage, 0);
        assert!(!evaluation.is_complete);
    }

    #[tokio::test]
    async fn test_extract_plain_text_document() {
        let pipeline = Pipeline::offline();
        let text = "KAPITOLA 1\n\nÚvod do bezpečnosti práce na staveništi a pravidla pro každý den.\n\n\
                    KAPITOLA 2\n\nOsobní ochranné pomůcky chrání zdraví pracovníků při práci.";

        let structured = pipeline.extract_structured_text(text.as_bytes()).await;
        assert!(structured.extraction.success);
        assert_eq!(structured.extraction.metadata.method, ExtractionMethod::Parser);
        assert!(structured.structured);
        assert_eq!(structured.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_scoring_override() {
        let pipeline = Pipeline::offline().with_scoring(ScoringConfig {
            completion_threshold: 50,
            ..ScoringConfig::default()
        });

        let result = pipeline.evaluate_response_in(
            "Describe your work.",
            "I work in an office and I like it a lot, really.",
            "english_basic",
            Language::En,
        );
        assert_eq!(result.is_complete, result.completion_percentage >= 50);
    }

    #[tokio::test]
    async fn test_service_backed_topics() {
        let service = Arc::new(ScriptedService::replying("- Ladders\n- Scaffolding"));
        let pipeline = Pipeline::new(service, Arc::new(PlainTextParser));

        assert!(pipeline.is_generative_available());
        let topics = pipeline.extract_key_topics("content", Language::En).await;
        assert_eq!(topics, vec!["Ladders", "Scaffolding"]);
    }

    #[test]
    fn test_validate_pdf_entry_point() {
        let pipeline = Pipeline::offline();
        assert_eq!(pipeline.validate_pdf(b"").error.as_deref(), Some("Empty buffer"));
        assert!(!pipeline.validate_pdf(b"%PDF-1.4").valid);
    }
}
